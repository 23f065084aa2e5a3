use crate::lyrics::page::{Page, TextOptions, element_text};
use crate::lyrics::providers::{Addressing, SiteDescriptor};
use crate::lyrics::slug::{capitalized, fold, hyphenated};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "genius.com",
    addressing: Addressing::Direct(song_url),
    extract,
    headings: &["h1", "h2"],
};

/// `https://genius.com/Artist-name-song-title-lyrics`: only the artist's
/// first letter keeps its capital.
pub fn song_url(artist: &str, title: &str) -> Option<String> {
    let artist = hyphenated(&capitalized(&fold(artist)));
    let title = hyphenated(&fold(title));
    if artist.is_empty() || title.is_empty() {
        return None;
    }
    Some(format!("https://genius.com/{artist}-{title}-lyrics"))
}

fn extract(page: &Page) -> Option<String> {
    // Legacy layout: a single `.lyrics` block.
    if let Some(el) = page.first(".lyrics") {
        let text = element_text(el, &TextOptions::default());
        if !text.trim().is_empty() {
            return Some(text.trim().to_string());
        }
    }

    let containers =
        page.select(r#"div[data-lyrics-container="true"], div[class*="Lyrics__Container-sc-"]"#);
    if containers.is_empty() {
        return None;
    }
    let mut lyrics = String::new();
    for container in containers {
        lyrics.push_str(&element_text(container, &TextOptions::default()));
        lyrics.push('\n');
    }
    Some(lyrics.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::types::{Expected, ScrapeOutcome};

    #[test]
    fn url_capitalizes_artist_only() {
        assert_eq!(
            song_url("QUEEN", "Bohemian Rhapsody").as_deref(),
            Some("https://genius.com/Queen-bohemian-rhapsody-lyrics")
        );
        assert_eq!(
            song_url("Sigur Rós", "Hoppípolla").as_deref(),
            Some("https://genius.com/Sigur-ros-hoppipolla-lyrics")
        );
        assert_eq!(song_url("!!!", "x"), None);
    }

    #[test]
    fn scrapes_modern_containers() {
        let body = r#"<html><head><title>Queen – Bohemian Rhapsody Lyrics | Genius Lyrics</title></head><body>
            <div data-lyrics-container="true" class="Lyrics__Container-sc-1ynbvzw-1">[Intro]<br>Is this the real life?<br>Is this just fantasy?</div>
            <div data-lyrics-container="true" class="Lyrics__Container-sc-1ynbvzw-1">Caught in a <a href="/x"><span>landslide</span></a></div>
            </body></html>"#;
        let outcome = SITE.scrape(body, &Expected::new("Queen", "Bohemian Rhapsody"));
        assert_eq!(
            outcome,
            ScrapeOutcome::Lyrics(
                "[Intro]\nIs this the real life?\nIs this just fantasy?\nCaught in a landslide".into()
            )
        );
    }

    #[test]
    fn scrapes_legacy_block() {
        let body = r#"<div class="lyrics"><p>Line one<br>Line two</p></div>"#;
        assert_eq!(
            SITE.scrape(body, &Expected::trusted()),
            ScrapeOutcome::Lyrics("Line one\nLine two".into())
        );
    }

    #[test]
    fn page_without_lyrics() {
        assert_eq!(
            SITE.scrape("<p>Page not found</p>", &Expected::trusted()),
            ScrapeOutcome::NoLyrics
        );
    }
}
