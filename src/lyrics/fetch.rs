//! Fetch orchestration: guessed URLs on every addressable site in random
//! order, once more with a simplified title, then the search fallback.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;

use crate::config::Settings;
use crate::lyrics::gate::{ReqwestTransport, RequestGate, Transport};
use crate::lyrics::providers::SourceRegistry;
use crate::lyrics::search::{SearchCredentials, search_links};
use crate::lyrics::types::{Expected, LyricsRequest, PAGE_HEADERS, ScrapeOutcome};

// "Song (Live)", "Song [Remastered 2011]"
static TRAILING_QUALIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\(\[][^\)\]]*[\)\]]\s*$").unwrap());
static QUERY_NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

pub struct LyricsFetcher {
    gate: RequestGate,
    registry: SourceRegistry,
    search: Option<SearchCredentials>,
}

impl LyricsFetcher {
    pub fn new(
        gate: RequestGate,
        registry: SourceRegistry,
        search: Option<SearchCredentials>,
    ) -> Self {
        Self {
            gate,
            registry,
            search,
        }
    }

    /// Standard registry over the shared HTTP client.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport), settings)
    }

    pub fn with_transport(transport: Arc<dyn Transport>, settings: &Settings) -> Self {
        Self::new(
            RequestGate::new(transport, settings.backoff),
            SourceRegistry::standard(),
            settings.search.clone(),
        )
    }

    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    /// Raw lyrics for `request`, or an empty string when no source has them.
    pub async fn fetch(&self, request: &LyricsRequest) -> String {
        let artist = request.artist.trim();
        let title = request.title.trim();
        if artist.is_empty() || title.is_empty() {
            tracing::info!(artist, title, "Artist or title missing, not fetching");
            return String::new();
        }

        if let Some(lyrics) = self.try_direct(artist, title).await {
            return lyrics;
        }

        let simplified = TRAILING_QUALIFIER_RE.replace(title, "");
        let simplified = if simplified.is_empty() { title } else { &*simplified };
        if simplified != title {
            tracing::debug!(title, simplified, "Retrying with simplified title");
            if let Some(lyrics) = self.try_direct(artist, simplified).await {
                return lyrics;
            }
        }

        // The simplified title matches pages shown with or without the qualifier.
        if let Some(credentials) = &self.search
            && let Some(lyrics) = self
                .try_search(credentials, request, &Expected::new(artist, simplified))
                .await
        {
            return lyrics;
        }

        tracing::info!(artist, title, "No lyrics found");
        String::new()
    }

    /// Scrape a known page without validating what song it shows.
    pub async fn fetch_url(&self, url: &str) -> String {
        match self.try_page(url, &Expected::trusted()).await {
            Some(lyrics) => lyrics,
            None => {
                tracing::info!(url, "No lyrics on page");
                String::new()
            }
        }
    }

    async fn try_direct(&self, artist: &str, title: &str) -> Option<String> {
        let mut sites = self.registry.addressable();
        sites.shuffle(&mut rand::rng());

        let expected = Expected::new(artist, title);
        for site in sites {
            let Some(url) = site.candidate_url(&self.gate, artist, title).await else {
                continue;
            };
            if let Some(lyrics) = self.try_page(&url, &expected).await {
                return Some(lyrics);
            }
        }
        None
    }

    async fn try_search(
        &self,
        credentials: &SearchCredentials,
        request: &LyricsRequest,
        expected: &Expected,
    ) -> Option<String> {
        let raw_query = format!("{} {}", request.artist.trim(), request.title.trim());
        let query = QUERY_NOISE_RE.replace_all(&raw_query, "");
        let links = search_links(&self.gate, credentials, &query, &request.language_hint).await;
        tracing::debug!(query = %query, results = links.len(), "Trying search results");

        for link in links {
            if let Some(lyrics) = self.try_page(&link, expected).await {
                return Some(lyrics);
            }
        }
        None
    }

    async fn try_page(&self, url: &str, expected: &Expected) -> Option<String> {
        if self.registry.dispatch(url).is_none() {
            tracing::debug!(url, "No scraper for URL");
            return None;
        }
        let body = self.gate.get(url, &[], PAGE_HEADERS).await.into_body()?;
        match self.registry.scrape(url, &body, expected) {
            ScrapeOutcome::Lyrics(lyrics) if !lyrics.is_empty() => {
                tracing::info!(url, "Lyrics found");
                Some(lyrics)
            }
            outcome => {
                tracing::debug!(url, outcome = ?outcome, "No lyrics from page");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::gate::BackoffPolicy;
    use crate::lyrics::gate::testing::CannedTransport;
    use crate::lyrics::providers::{azlyrics, genius, letras, lyricsted};
    use crate::lyrics::search::SEARCH_URL;

    fn fetcher(transport: Arc<CannedTransport>, registry: SourceRegistry) -> LyricsFetcher {
        let credentials = SearchCredentials {
            api_key: "k".into(),
            engine_id: "c".into(),
        };
        LyricsFetcher::new(
            RequestGate::new(transport, BackoffPolicy::default()),
            registry,
            Some(credentials),
        )
    }

    fn genius_page(title: &str, lyrics: &str) -> String {
        format!(
            r#"<html><head><title>{title} | Genius Lyrics</title></head><body><div data-lyrics-container="true">{lyrics}</div></body></html>"#
        )
    }

    #[tokio::test]
    async fn missing_title_is_not_fetched() {
        let transport = Arc::new(CannedTransport::new());
        let fetcher = fetcher(transport.clone(), SourceRegistry::standard());
        assert_eq!(fetcher.fetch(&LyricsRequest::new("Queen", "  ")).await, "");
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn direct_hit_skips_search() {
        let page = genius_page("Queen – Under Pressure Lyrics", "Pressure<br>pushing down on me");
        let transport = Arc::new(CannedTransport::new().route(
            "https://genius.com/Queen-under-pressure-lyrics",
            200,
            &page,
        ));
        let registry = SourceRegistry::empty().with_site(genius::SITE);
        let fetcher = fetcher(transport.clone(), registry);

        let lyrics = fetcher.fetch(&LyricsRequest::new("Queen", "Under Pressure")).await;
        assert_eq!(lyrics, "Pressure\npushing down on me");
        assert!(transport.requested().iter().all(|u| !u.starts_with(SEARCH_URL)));
    }

    #[tokio::test]
    async fn qualifier_is_dropped_on_retry() {
        let index = r#"<ul class="cnt-list"><li><a href="/queen/64317/">Under Pressure</a></li></ul>"#;
        let page = r#"<html><head><title>Under Pressure - Queen - LETRAS.MUS.BR</title></head>
            <body><div class="cnt-letra"><p>Pressure</p></div></body></html>"#;
        let transport = Arc::new(
            CannedTransport::new()
                .route("https://www.letras.mus.br/queen/", 200, index)
                .route("https://www.letras.mus.br/queen/64317/", 200, page),
        );
        let registry = SourceRegistry::empty().with_site(letras::SITE);
        let fetcher = fetcher(transport.clone(), registry);

        let lyrics = fetcher
            .fetch(&LyricsRequest::new("Queen", "Under Pressure (Remastered 2011)"))
            .await;
        assert_eq!(lyrics, "Pressure");
        assert_eq!(
            transport.requested(),
            [
                "https://www.letras.mus.br/queen/",
                "https://www.letras.mus.br/queen/",
                "https://www.letras.mus.br/queen/64317/",
            ]
        );
    }

    #[tokio::test]
    async fn search_runs_once_after_direct_sites_fail() {
        let results = r#"{"items":[
            {"link":"https://unknown.example/queen"},
            {"link":"https://www.lyricsted.com/queen-under-pressure/"},
            {"link":"https://www.lyricsted.com/never-reached/"}]}"#;
        let page = r#"<html><head><title>Under Pressure Lyrics – Queen</title></head>
            <body><div class="lyric-content"><p>Pressure</p></div></body></html>"#;
        let transport = Arc::new(
            CannedTransport::new()
                .route(SEARCH_URL, 200, results)
                .route("https://www.lyricsted.com/queen-under-pressure/", 200, page),
        );
        let registry = SourceRegistry::empty()
            .with_site(genius::SITE)
            .with_site(azlyrics::SITE)
            .with_site(lyricsted::SITE);
        let fetcher = fetcher(transport.clone(), registry);

        let lyrics = fetcher.fetch(&LyricsRequest::new("Queen", "Under Pressure")).await;
        assert_eq!(lyrics, "Pressure");

        let requested = transport.requested();
        let searches = requested.iter().filter(|u| u.starts_with(SEARCH_URL)).count();
        assert_eq!(searches, 1);
        assert!(requested.iter().any(|u| u.ends_with("q=Queen Under Pressure")));
        assert!(!requested.iter().any(|u| u.contains("never-reached")));
        assert!(!requested.iter().any(|u| u.contains("unknown.example")));
    }

    #[tokio::test]
    async fn search_result_without_qualifier_is_accepted() {
        let results = r#"{"items":[{"link":"https://www.lyricsted.com/queen-under-pressure/"}]}"#;
        let page = r#"<html><head><title>Under Pressure Lyrics – Queen</title></head>
            <body><div class="lyric-content"><p>Pressure</p></div></body></html>"#;
        let transport = Arc::new(
            CannedTransport::new()
                .route(SEARCH_URL, 200, results)
                .route("https://www.lyricsted.com/queen-under-pressure/", 200, page),
        );
        let registry = SourceRegistry::empty().with_site(lyricsted::SITE);
        let fetcher = fetcher(transport.clone(), registry);

        let lyrics = fetcher
            .fetch(&LyricsRequest::new("Queen", "Under Pressure (Live)"))
            .await;
        assert_eq!(lyrics, "Pressure");
        assert!(
            transport
                .requested()
                .iter()
                .any(|u| u.ends_with("q=Queen Under Pressure Live"))
        );
    }

    #[tokio::test]
    async fn validation_failure_moves_on() {
        let wrong = genius_page("Queen – Bohemian Rhapsody Lyrics", "Mama");
        let transport = Arc::new(
            CannedTransport::new()
                .route("https://genius.com/Queen-under-pressure-lyrics", 200, &wrong)
                .route(SEARCH_URL, 200, "{}"),
        );
        let registry = SourceRegistry::empty().with_site(genius::SITE);
        let fetcher = fetcher(transport, registry);
        assert_eq!(fetcher.fetch(&LyricsRequest::new("Queen", "Under Pressure")).await, "");
    }

    #[tokio::test]
    async fn known_url_is_not_validated() {
        let page = genius_page("Some Other Title", "Anything");
        let transport = Arc::new(CannedTransport::new().route("https://genius.com/x", 200, &page));
        let fetcher = fetcher(transport, SourceRegistry::standard());
        assert_eq!(fetcher.fetch_url("https://genius.com/x").await, "Anything");
        assert_eq!(fetcher.fetch_url("https://example.org/x").await, "");
    }
}
