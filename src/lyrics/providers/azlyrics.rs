use crate::lyrics::page::{Page, TextOptions, element_text};
use crate::lyrics::providers::{Addressing, SiteDescriptor};
use crate::lyrics::slug::{fold, squashed};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "azlyrics.com",
    addressing: Addressing::Direct(song_url),
    extract,
    headings: &[".lyricsh", "h1"],
};

pub fn song_url(artist: &str, title: &str) -> Option<String> {
    let artist = squashed(&fold(artist));
    let title = squashed(&fold(title));
    if artist.is_empty() || title.is_empty() {
        return None;
    }
    Some(format!("https://www.azlyrics.com/lyrics/{artist}/{title}.html"))
}

// The lyrics sit in the only div without an id or class.
fn extract(page: &Page) -> Option<String> {
    let el = page
        .first("div.col-xs-12.col-lg-8 > div:not([id]):not([class])")
        .or_else(|| page.first("div:not([id]):not([class])"))?;
    let text = element_text(el, &TextOptions::default());
    Some(text.replace("\n\n", "\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::types::{Expected, ScrapeOutcome};

    #[test]
    fn url_drops_everything_but_word_chars() {
        assert_eq!(
            song_url("Guns N' Roses", "Sweet Child O' Mine").as_deref(),
            Some("https://www.azlyrics.com/lyrics/gunsnroses/sweetchildomine.html")
        );
    }

    #[test]
    fn scrapes_unmarked_div() {
        let body = "<html><head><title>Guns N' Roses - Sweet Child O' Mine Lyrics | AZLyrics.com</title></head><body>\
            <div class=\"col-xs-12 col-lg-8 text-center\"><div class=\"ringtone\">x</div>\
            <div>\n<!-- comment -->\nShe's got a smile<br>\nthat it seems to me<br>\n</div></div></body></html>";
        let outcome = SITE.scrape(body, &Expected::new("Guns N' Roses", "Sweet Child O' Mine"));
        assert_eq!(
            outcome,
            ScrapeOutcome::Lyrics("She's got a smile\nthat it seems to me".into())
        );
    }
}
