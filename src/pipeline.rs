//! Per-track flow: read the tags, fetch when needed, normalize, settle the
//! language, write back.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Settings;
use crate::language::{
    self, INSTRUMENTAL, INSTRUMENTAL_LYRICS, LanguageResolver, UNDETERMINED, canonical_subtag,
};
use crate::lyrics::{LyricsFetcher, LyricsRequest};
use crate::normalize::normalize;
use crate::tags::MetadataStore;

pub const LYRICS_KEY: &str = "lyrics";
pub const LANGUAGE_KEY: &str = "language";
pub const LYRICIST_KEY: &str = "lyricist";

const DECLARED_LANGUAGE_KEYS: &[&str] = &[LANGUAGE_KEY, "~releaselanguage"];
const ARTIST_KEYS: &[&str] = &["artist", "albumartist", "artistsort", "albumartistsort"];
const TITLE_KEYS: &[&str] = &["title", "_recordingtitle", "work"];

// "lyrics:eng", "lyrics:description" and the like
static NONSTANDARD_LYRICS_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.*\W)?lyrics\W.*$").unwrap());

/// What `process` did to one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Updated,
    Instrumental,
    Unchanged,
    /// No lyrics in the tags and none found.
    NoLyrics,
}

pub struct LyricsPipeline {
    fetcher: Arc<LyricsFetcher>,
    resolver: LanguageResolver,
    auto_fetch: bool,
}

impl LyricsPipeline {
    pub fn new(fetcher: Arc<LyricsFetcher>, resolver: LanguageResolver, auto_fetch: bool) -> Self {
        Self {
            fetcher,
            resolver,
            auto_fetch,
        }
    }

    pub fn from_settings(fetcher: Arc<LyricsFetcher>, settings: &Settings) -> Self {
        let resolver = LanguageResolver::new(
            Box::new(language::WhatlangDetector),
            settings.detection_threshold,
        );
        Self::new(fetcher, resolver, settings.auto_fetch)
    }

    pub fn fetcher(&self) -> &LyricsFetcher {
        &self.fetcher
    }

    pub async fn process(
        &self,
        store: &mut dyn MetadataStore,
        force_fetch: bool,
    ) -> ProcessOutcome {
        let before = snapshot(store);

        let declared = canonical_subtag(
            &store
                .first_of(DECLARED_LANGUAGE_KEYS)
                .unwrap_or_else(|| UNDETERMINED.to_string()),
        );
        if declared == UNDETERMINED {
            store.remove(LANGUAGE_KEY);
        } else {
            store.set(LANGUAGE_KEY, &declared);
        }

        if declared == INSTRUMENTAL {
            mark_instrumental(store);
            return ProcessOutcome::Instrumental;
        }

        let mut lyrics = take_lyrics(store);

        if force_fetch || (lyrics.trim().is_empty() && self.auto_fetch) {
            let artist = store.first_of(ARTIST_KEYS).unwrap_or_default();
            let title = store.first_of(TITLE_KEYS).unwrap_or_default();
            let request = LyricsRequest::new(artist, title).with_language(declared.clone());
            let fetched = self.fetcher.fetch(&request).await;
            if !fetched.is_empty() {
                lyrics = fetched;
            }
        }

        if language::is_instrumental_text(&lyrics) {
            mark_instrumental(store);
            return ProcessOutcome::Instrumental;
        }
        if lyrics.trim().is_empty() {
            return ProcessOutcome::NoLyrics;
        }

        let normalized = normalize(&lyrics);
        let verdict = self.resolver.resolve(&declared, &normalized);
        store.set(LYRICS_KEY, &normalized);
        if verdict.is_undetermined() {
            store.remove(LANGUAGE_KEY);
        } else {
            store.set(LANGUAGE_KEY, &verdict.subtag);
        }

        if snapshot(store) == before {
            ProcessOutcome::Unchanged
        } else {
            tracing::info!(language = %verdict.subtag, "Lyrics updated");
            ProcessOutcome::Updated
        }
    }
}

/// The `lyrics` tag, or failing that the first non-standard lyrics tag.
/// Non-standard lyrics tags are removed either way.
fn take_lyrics(store: &mut dyn MetadataStore) -> String {
    let mut lyrics = store.get(LYRICS_KEY).unwrap_or_default();
    for key in store.keys() {
        if key == LYRICS_KEY || !NONSTANDARD_LYRICS_KEY_RE.is_match(&key) {
            continue;
        }
        if lyrics.trim().is_empty()
            && let Some(value) = store.get(&key)
        {
            lyrics = value;
        }
        tracing::debug!(key = %key, "Dropping non-standard lyrics tag");
        store.remove(&key);
    }
    lyrics
}

fn mark_instrumental(store: &mut dyn MetadataStore) {
    store.set(LYRICS_KEY, INSTRUMENTAL_LYRICS);
    store.set(LANGUAGE_KEY, INSTRUMENTAL);
    store.remove(LYRICIST_KEY);
}

fn snapshot(store: &dyn MetadataStore) -> Vec<(String, Option<String>)> {
    store
        .keys()
        .into_iter()
        .map(|key| {
            let value = store.get(&key);
            (key, value)
        })
        .collect()
}
