use crate::lyrics::page::{Page, TextOptions, element_text};
use crate::lyrics::providers::{Addressing, DirectoryLookup, SiteDescriptor};
use crate::lyrics::slug::{fold, underscored};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "lyricsmania.com",
    addressing: Addressing::Directory(DirectoryLookup {
        index_url: artist_url,
        song_links: r#"a[href*="_lyrics_"]"#,
    }),
    extract,
    headings: &["h1", "h2"],
};

pub fn artist_url(artist: &str) -> Option<String> {
    let artist = underscored(&fold(artist));
    if artist.is_empty() {
        return None;
    }
    Some(format!("https://www.lyricsmania.com/{artist}_lyrics.html"))
}

fn extract(page: &Page) -> Option<String> {
    let el = page.first("div.lyrics-body")?;
    let text = element_text(el, &TextOptions { skip: &["div"], separator: None });
    Some(text.replace("\n\n", "\n").trim().to_string())
}
