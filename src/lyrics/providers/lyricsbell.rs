use crate::lyrics::page::{Page, TextOptions, joined_blocks};
use crate::lyrics::providers::{Addressing, SiteDescriptor};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "lyricsbell.com",
    addressing: Addressing::SearchOnly,
    extract,
    headings: &["h1"],
};

fn extract(page: &Page) -> Option<String> {
    let paragraphs = page.select(".lyrics-col p");
    if paragraphs.is_empty() {
        return None;
    }
    Some(joined_blocks(paragraphs, &TextOptions::default(), false))
}
