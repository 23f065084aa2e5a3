use crate::lyrics::page::{Page, TextOptions, joined_blocks};
use crate::lyrics::providers::{Addressing, SiteDescriptor};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "lyricsoff.com",
    addressing: Addressing::SearchOnly,
    extract,
    headings: &["h1"],
};

// Lines come as bare text nodes inside each <p>, not separated by <br>.
fn extract(page: &Page) -> Option<String> {
    let paragraphs = page.select("#main_lyrics p");
    if paragraphs.is_empty() {
        return None;
    }
    let opts = TextOptions {
        skip: &[],
        separator: Some("\n"),
    };
    Some(joined_blocks(paragraphs, &opts, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::types::{Expected, ScrapeOutcome};

    #[test]
    fn text_nodes_become_lines() {
        let body = r#"<div id="main_lyrics"><p>First line<span>Second line</span></p><p>Third line</p></div>"#;
        assert_eq!(
            SITE.scrape(body, &Expected::trusted()),
            ScrapeOutcome::Lyrics("First line\nSecond line\n\nThird line".into())
        );
    }
}
