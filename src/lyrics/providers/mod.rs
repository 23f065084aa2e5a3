//! Source registry: which lyrics sites we know, how to guess a page URL on
//! each of them, and how to pull the lyrics back out of that page.
//!
//! Sites come in three flavours:
//!
//! - **direct**: the URL is a pure function of artist and title slugs;
//! - **directory**: an artist index page is fetched first and the song is
//!   picked from its links;
//! - **search-only**: we can scrape the page but can't guess its address, so
//!   it is only reached through search results.

pub mod azlyrics;
pub mod genius;
pub mod glamsham;
pub mod letras;
pub mod lyrics_com;
pub mod lyricsbell;
pub mod lyricsmania;
pub mod lyricsmint;
pub mod lyricsmode;
pub mod lyricsoff;
pub mod lyricsted;
pub mod vagalume;

use crate::lyrics::gate::{RequestGate, host_of};
use crate::lyrics::page::Page;
use crate::lyrics::slug::fingerprint;
use crate::lyrics::types::{Expected, PAGE_HEADERS, ScrapeOutcome};

/// `(artist, title) -> page URL`, or `None` when the names don't slug.
pub type UrlBuilder = fn(&str, &str) -> Option<String>;

/// Site-specific DOM extraction. Validation happens before this runs.
pub type Extractor = fn(&Page) -> Option<String>;

/// Decides whether a descriptor serves a host.
pub type HostPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Artist index page plus the selector for its song links.
#[derive(Clone, Copy)]
pub struct DirectoryLookup {
    pub index_url: fn(&str) -> Option<String>,
    pub song_links: &'static str,
}

#[derive(Clone, Copy)]
pub enum Addressing {
    Direct(UrlBuilder),
    Directory(DirectoryLookup),
    SearchOnly,
}

#[derive(Clone, Copy)]
pub struct SiteDescriptor {
    /// Registrable domain, also the dispatch key.
    pub domain: &'static str,
    pub addressing: Addressing,
    pub extract: Extractor,
    /// Selectors for where the page shows its song's title and artist, on top
    /// of the document title.
    pub headings: &'static [&'static str],
}

impl SiteDescriptor {
    pub fn is_search_only(&self) -> bool {
        matches!(self.addressing, Addressing::SearchOnly)
    }

    /// Guess the page URL for a song. Never fails: anything that goes wrong,
    /// including the index fetch of a directory site, is `None`.
    pub async fn candidate_url(
        &self,
        gate: &RequestGate,
        artist: &str,
        title: &str,
    ) -> Option<String> {
        match self.addressing {
            Addressing::Direct(build) => build(artist, title),
            Addressing::Directory(lookup) => {
                let index = (lookup.index_url)(artist)?;
                let body = gate.get(&index, &[], PAGE_HEADERS).await.into_body()?;
                let found = find_song(&index, &body, lookup.song_links, title);
                if found.is_none() {
                    tracing::debug!(site = self.domain, index = %index, "Song not listed on artist page");
                }
                found
            }
            Addressing::SearchOnly => None,
        }
    }

    /// Validate the page against `expected` (unless trusted) and extract.
    pub fn scrape(&self, body: &str, expected: &Expected) -> ScrapeOutcome {
        let page = Page::parse(body);
        if !expected.is_trusted() && !expected.matches(&page.displayed_fingerprints(self.headings)) {
            tracing::debug!(site = self.domain, "Page shows a different song");
            return ScrapeOutcome::ValidationFailed;
        }
        match (self.extract)(&page) {
            Some(text) if !text.trim().is_empty() => ScrapeOutcome::Lyrics(text.trim().to_string()),
            _ => ScrapeOutcome::NoLyrics,
        }
    }
}

/// True for `domain` itself and any of its subdomains.
pub fn serves_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Pick the song link whose text matches `title` from an artist index page.
/// Exact fingerprint matches win over suffix matches.
fn find_song(index_url: &str, body: &str, song_links: &str, title: &str) -> Option<String> {
    let wanted = fingerprint(title);
    if wanted.is_empty() {
        return None;
    }
    let base = reqwest::Url::parse(index_url).ok()?;
    let page = Page::parse(body);

    let mut suffix_match = None;
    for anchor in page.select(song_links) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let shown = fingerprint(&anchor.text().collect::<String>());
        let shown = shown.strip_suffix("lyrics").unwrap_or(&shown);
        if shown == wanted {
            return base.join(href).ok().map(String::from);
        }
        if suffix_match.is_none() && shown.ends_with(&wanted) {
            suffix_match = base.join(href).ok().map(String::from);
        }
    }
    suffix_match
}

/// Ordered `(predicate, descriptor)` list. Dispatch tests predicates in
/// order and the first match wins.
pub struct SourceRegistry {
    entries: Vec<(HostPredicate, SiteDescriptor)>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl SourceRegistry {
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Every site we know how to scrape.
    pub fn standard() -> Self {
        Self::empty()
            .with_site(letras::SITE)
            .with_site(genius::SITE)
            .with_site(azlyrics::SITE)
            .with_site(lyricsmode::SITE)
            .with_site(vagalume::SITE)
            .with_site(lyrics_com::SITE)
            .with_site(lyricsmania::SITE)
            .with_site(glamsham::SITE)
            .with_site(lyricsbell::SITE)
            .with_site(lyricsted::SITE)
            .with_site(lyricsoff::SITE)
            .with_site(lyricsmint::SITE)
    }

    /// Register `site` for its own domain and subdomains.
    pub fn with_site(self, site: SiteDescriptor) -> Self {
        let domain = site.domain;
        self.with_predicate(Box::new(move |host: &str| serves_domain(host, domain)), site)
    }

    pub fn with_predicate(mut self, predicate: HostPredicate, site: SiteDescriptor) -> Self {
        self.entries.push((predicate, site));
        self
    }

    pub fn sites(&self) -> impl Iterator<Item = &SiteDescriptor> {
        self.entries.iter().map(|(_, site)| site)
    }

    /// Sites whose URL we can work out ourselves, in registry order.
    pub fn addressable(&self) -> Vec<&SiteDescriptor> {
        self.sites().filter(|site| !site.is_search_only()).collect()
    }

    pub fn dispatch(&self, url: &str) -> Option<&SiteDescriptor> {
        let host = host_of(url)?;
        self.entries
            .iter()
            .find(|(predicate, _)| predicate(&host))
            .map(|(_, site)| site)
    }

    /// Scrape `body` with whichever site serves `url`.
    pub fn scrape(&self, url: &str, body: &str, expected: &Expected) -> ScrapeOutcome {
        match self.dispatch(url) {
            Some(site) => site.scrape(body, expected),
            None => ScrapeOutcome::Unsupported,
        }
    }
}
