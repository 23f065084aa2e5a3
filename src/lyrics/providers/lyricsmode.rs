use crate::lyrics::page::{Page, TextOptions, element_text};
use crate::lyrics::providers::{Addressing, SiteDescriptor};
use crate::lyrics::slug::{fold, underscored};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "lyricsmode.com",
    addressing: Addressing::Direct(song_url),
    extract,
    headings: &["h1"],
};

/// Pages are filed under the artist's first letter.
pub fn song_url(artist: &str, title: &str) -> Option<String> {
    let artist = underscored(&fold(artist));
    let title = underscored(&fold(title));
    let initial = artist.chars().next()?;
    if title.is_empty() {
        return None;
    }
    Some(format!(
        "https://www.lyricsmode.com/lyrics/{initial}/{artist}/{title}.html"
    ))
}

fn extract(page: &Page) -> Option<String> {
    let el = page.first("div#lyrics_text")?;
    let text = element_text(el, &TextOptions { skip: &["div"], separator: None });
    Some(text.replace("\n\n", "\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::types::{Expected, ScrapeOutcome};

    #[test]
    fn url_uses_initial_and_underscores() {
        assert_eq!(
            song_url("The Beatles", "Let It Be").as_deref(),
            Some("https://www.lyricsmode.com/lyrics/t/the_beatles/let_it_be.html")
        );
        assert_eq!(song_url("", "Let It Be"), None);
    }

    #[test]
    fn inner_divs_are_dropped() {
        let body = r#"<div id="lyrics_text">When I find myself<br>
in times of trouble<div class="ad">Advertisement</div></div>"#;
        assert_eq!(
            SITE.scrape(body, &Expected::trusted()),
            ScrapeOutcome::Lyrics("When I find myself\nin times of trouble".into())
        );
    }
}
