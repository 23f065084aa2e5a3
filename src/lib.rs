//! Lyrics acquisition and normalization.
//!
//! [`lyrics::LyricsFetcher`] finds raw lyrics across a set of unreliable
//! lyrics sites, [`normalize::normalize`] canonicalizes the text, and
//! [`pipeline::LyricsPipeline`] ties both to a track's tags together with the
//! [`language`] resolver.

pub mod config;
pub mod language;
pub mod lyrics;
pub mod normalize;
pub mod pipeline;
pub mod tags;

pub use config::Settings;
pub use lyrics::{LyricsError, LyricsFetcher, LyricsRequest};
pub use normalize::normalize;
pub use pipeline::{LyricsPipeline, ProcessOutcome};
pub use tags::{MetadataStore, TrackTags};
