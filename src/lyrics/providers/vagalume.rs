use crate::lyrics::page::{Page, TextOptions, element_text};
use crate::lyrics::providers::{Addressing, SiteDescriptor};
use crate::lyrics::slug::{dashed, fold};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "vagalume.com.br",
    addressing: Addressing::Direct(song_url),
    extract,
    headings: &["h1", "h2"],
};

pub fn song_url(artist: &str, title: &str) -> Option<String> {
    let artist = dashed(&fold(artist));
    let title = dashed(&fold(title));
    if artist.is_empty() || title.is_empty() {
        return None;
    }
    Some(format!("https://www.vagalume.com.br/{artist}/{title}.html"))
}

fn extract(page: &Page) -> Option<String> {
    let el = page.first("div#lyrics")?;
    Some(element_text(el, &TextOptions::default()).trim().to_string())
}
