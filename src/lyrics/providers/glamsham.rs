use crate::lyrics::page::{Page, TextOptions, element_text};
use crate::lyrics::providers::{Addressing, SiteDescriptor};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "glamsham.com",
    addressing: Addressing::SearchOnly,
    extract,
    headings: &[],
};

// Table layout with no ids; the lyrics are the sixth `font.general`.
fn extract(page: &Page) -> Option<String> {
    let el = page.select("font.general").into_iter().nth(5)?;
    Some(element_text(el, &TextOptions::default()).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::types::{Expected, ScrapeOutcome};

    #[test]
    fn picks_sixth_general_font() {
        let mut body = String::new();
        for i in 0..5 {
            body.push_str(&format!(r#"<font class="general">menu {i}</font>"#));
        }
        body.push_str(r#"<font class="general">Tujhe dekha<br>to yeh jaana sanam</font>"#);
        assert_eq!(
            SITE.scrape(&body, &Expected::trusted()),
            ScrapeOutcome::Lyrics("Tujhe dekha\nto yeh jaana sanam".into())
        );
        assert_eq!(
            SITE.scrape(r#"<font class="general">menu</font>"#, &Expected::trusted()),
            ScrapeOutcome::NoLyrics
        );
    }
}
