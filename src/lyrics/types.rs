use once_cell::sync::Lazy;
use reqwest::Client;
use thiserror::Error;

use crate::lyrics::slug::fingerprint;

// Shared HTTP client with reasonable defaults for timeouts
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client")
});

pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Headers sent with every lyrics page request. Several sites serve an empty
/// shell to clients that don't look like a browser arriving from a search.
pub const PAGE_HEADERS: &[(&str, &str)] = &[
    ("User-Agent", BROWSER_USER_AGENT),
    ("Referer", "https://www.google.com/"),
    ("Accept", "text/html,application/xhtml+xml"),
];

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Immutable input to a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsRequest {
    pub artist: String,
    pub title: String,
    /// Canonical ISO 639-3 subtag, or `und`.
    pub language_hint: String,
}

impl LyricsRequest {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            language_hint: crate::language::UNDETERMINED.to_string(),
        }
    }

    pub fn with_language(mut self, subtag: impl Into<String>) -> Self {
        self.language_hint = subtag.into();
        self
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// What happened to one gated request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(HttpResponse),
    /// Skipped without touching the network: the host failed recently.
    CoolingDown(crate::lyrics::gate::HostFailureRecord),
    RateLimited,
    /// Non-200 status, or `status: None` for a transport error.
    TransientFailure { status: Option<u16> },
}

impl FetchOutcome {
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Fetched(resp) => Some(resp.body),
            _ => None,
        }
    }
}

/// What a scraper made of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Lyrics(String),
    NoLyrics,
    /// The page shows a different song than the one asked for.
    ValidationFailed,
    /// No registered site serves this URL.
    Unsupported,
}

impl ScrapeOutcome {
    pub fn into_lyrics(self) -> Option<String> {
        match self {
            ScrapeOutcome::Lyrics(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Fingerprints of the artist and title a page is expected to display.
///
/// Both empty means the URL is trusted and validation is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expected {
    pub artist: String,
    pub title: String,
}

impl Expected {
    pub fn new(artist: &str, title: &str) -> Self {
        Self {
            artist: fingerprint(artist),
            title: fingerprint(title),
        }
    }

    /// No validation: the caller fetched a known-good URL.
    pub fn trusted() -> Self {
        Self::default()
    }

    pub fn is_trusted(&self) -> bool {
        self.artist.is_empty() && self.title.is_empty()
    }

    /// True when the fingerprinted title fragments a page shows contain both
    /// expected values, each within a single fragment.
    pub fn matches(&self, displayed: &[String]) -> bool {
        displayed.iter().any(|fp| fp.contains(&self.artist))
            && displayed.iter().any(|fp| fp.contains(&self.title))
    }
}

pub(crate) fn http_client() -> &'static Client {
    &HTTP_CLIENT
}
