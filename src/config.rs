use std::time::Duration;

use crate::language::DEFAULT_DETECTION_THRESHOLD;
use crate::lyrics::gate::BackoffPolicy;
use crate::lyrics::search::SearchCredentials;

pub const SEARCH_KEY_ENV: &str = "LYRICSWEEP_SEARCH_KEY";
pub const SEARCH_ENGINE_ENV: &str = "LYRICSWEEP_SEARCH_ENGINE";
pub const AUTO_FETCH_ENV: &str = "LYRICSWEEP_AUTO_FETCH";

/// Library-side settings shared by the fetcher and the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Fetch when a track has no lyrics, without being asked to.
    pub auto_fetch: bool,
    /// Search fallback is skipped without credentials.
    pub search: Option<SearchCredentials>,
    pub backoff: BackoffPolicy,
    pub detection_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_fetch: true,
            search: None,
            backoff: BackoffPolicy::default(),
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` finds under the
    /// `LYRICSWEEP_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let key = lookup(SEARCH_KEY_ENV).map(|s| s.trim().to_string());
        let engine = lookup(SEARCH_ENGINE_ENV).map(|s| s.trim().to_string());
        if let (Some(api_key), Some(engine_id)) = (key, engine)
            && !api_key.is_empty()
            && !engine_id.is_empty()
        {
            settings.search = Some(SearchCredentials { api_key, engine_id });
        }
        if let Some(flag) = lookup(AUTO_FETCH_ENV)
            && let Some(enabled) = parse_flag(&flag)
        {
            settings.auto_fetch = enabled;
        }
        settings
    }

    pub fn with_cooldowns(mut self, rate_limit: Option<u64>, failure: Option<u64>) -> Self {
        if let Some(secs) = rate_limit {
            self.backoff.rate_limit_cooldown = Duration::from_secs(secs);
        }
        if let Some(secs) = failure {
            self.backoff.failure_cooldown = Duration::from_secs(secs);
        }
        self
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
