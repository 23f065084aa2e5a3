use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-track key/value tags as kept by the host application. Stores are
/// `Send` so a track can be processed on a spawned task.
pub trait MetadataStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
    fn keys(&self) -> Vec<String>;

    /// First of `keys` with a non-blank value.
    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|value| !value.trim().is_empty())
    }
}

/// In-memory tag store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackTags {
    tags: BTreeMap<String, String>,
}

impl TrackTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl MetadataStore for TrackTags {
    fn get(&self, key: &str) -> Option<String> {
        self.tags.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.tags.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.tags.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.tags.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_skips_blank_values() {
        let tags = TrackTags::new().with("artist", " ").with("albumartist", "Queen");
        assert_eq!(
            tags.first_of(&["artist", "albumartist"]).as_deref(),
            Some("Queen")
        );
        assert_eq!(tags.first_of(&["title"]), None);
    }

    #[test]
    fn serializes_as_flat_map() {
        let tags = TrackTags::new().with("title", "Wave").with("artist", "Tom Jobim");
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"{"artist":"Tom Jobim","title":"Wave"}"#);
        let back: TrackTags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tags);
    }
}
