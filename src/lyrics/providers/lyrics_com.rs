use crate::lyrics::page::{Page, TextOptions, element_text};
use crate::lyrics::providers::{Addressing, DirectoryLookup, SiteDescriptor};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "lyrics.com",
    addressing: Addressing::Directory(DirectoryLookup {
        index_url: artist_url,
        song_links: r#"a[href^="/lyric"]"#,
    }),
    extract,
    headings: &["h1", "h3.lyric-artist"],
};

/// Artist pages take the name as typed, percent-encoded.
pub fn artist_url(artist: &str) -> Option<String> {
    let artist = artist.trim();
    if artist.is_empty() {
        return None;
    }
    Some(format!(
        "https://www.lyrics.com/artist/{}",
        urlencoding::encode(artist)
    ))
}

fn extract(page: &Page) -> Option<String> {
    let el = page.first("pre#lyric-body-text")?;
    Some(element_text(el, &TextOptions::default()).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::types::{Expected, ScrapeOutcome};

    #[test]
    fn artist_url_is_percent_encoded() {
        assert_eq!(
            artist_url("Simon & Garfunkel").as_deref(),
            Some("https://www.lyrics.com/artist/Simon%20%26%20Garfunkel")
        );
        assert_eq!(artist_url("  "), None);
    }

    #[test]
    fn scrapes_preformatted_body() {
        let body = "<pre id=\"lyric-body-text\" class=\"lyric-body\">Hello darkness, my old <a href=\"/x\">friend</a>\nI've come to talk with you again</pre>";
        assert_eq!(
            SITE.scrape(body, &Expected::trusted()),
            ScrapeOutcome::Lyrics("Hello darkness, my old friend\nI've come to talk with you again".into())
        );
    }
}
