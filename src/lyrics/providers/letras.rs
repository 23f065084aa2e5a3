use crate::lyrics::page::{Page, TextOptions, joined_blocks};
use crate::lyrics::providers::{Addressing, DirectoryLookup, SiteDescriptor};
use crate::lyrics::slug::{dashed, fold};

pub const SITE: SiteDescriptor = SiteDescriptor {
    domain: "letras.mus.br",
    addressing: Addressing::Directory(DirectoryLookup {
        index_url: artist_url,
        song_links: ".songList-table-songName[href], .songList-table-content a[href], .cnt-list a[href]",
    }),
    extract,
    headings: &["h1", "h2"],
};

pub fn artist_url(artist: &str) -> Option<String> {
    let artist = dashed(&fold(artist));
    if artist.is_empty() {
        return None;
    }
    Some(format!("https://www.letras.mus.br/{artist}/"))
}

// One <p> per stanza.
fn extract(page: &Page) -> Option<String> {
    let stanzas = page.select(r#"div[class*="cnt-letra"] p"#);
    if stanzas.is_empty() {
        return None;
    }
    Some(joined_blocks(stanzas, &TextOptions::default(), true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::gate::testing::CannedTransport;
    use crate::lyrics::gate::{BackoffPolicy, RequestGate};
    use crate::lyrics::types::{Expected, ScrapeOutcome};
    use std::sync::Arc;

    #[test]
    fn stanzas_are_separated_by_blank_lines() {
        let body = r#"<html><head><title>Garota de Ipanema - Tom Jobim - LETRAS.MUS.BR</title></head><body>
            <div class="lyric-original cnt-letra"><p>Olha que coisa mais linda<br>Mais cheia de graça</p>
            <p>Moça do corpo dourado<br>Do sol de Ipanema</p></div></body></html>"#;
        let outcome = SITE.scrape(body, &Expected::new("Tom Jobim", "Garota de Ipanema"));
        assert_eq!(
            outcome,
            ScrapeOutcome::Lyrics(
                "Olha que coisa mais linda\nMais cheia de graça\n\nMoça do corpo dourado\nDo sol de Ipanema"
                    .into()
            )
        );
    }

    #[tokio::test]
    async fn song_is_found_through_artist_index() {
        let index = r#"<ul class="cnt-list"><li><a href="/tom-jobim/49/">Garota de Ipanema</a></li>
            <li><a href="/tom-jobim/75/">Wave</a></li></ul>"#;
        let transport =
            Arc::new(CannedTransport::new().route("https://www.letras.mus.br/tom-jobim/", 200, index));
        let gate = RequestGate::new(transport, BackoffPolicy::default());
        let url = SITE.candidate_url(&gate, "Tom Jobim", "Wave").await;
        assert_eq!(url.as_deref(), Some("https://www.letras.mus.br/tom-jobim/75/"));
    }
}
