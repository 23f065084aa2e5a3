// lyrics/mod.rs - lyrics acquisition: sources, request gate, scraping, search
pub mod fetch;
pub mod gate;
pub mod page;
pub mod providers;
pub mod search;
pub mod slug;
pub mod types;

pub use fetch::LyricsFetcher;
pub use gate::{BackoffPolicy, FailureCache, HostFailureRecord, RequestGate, ReqwestTransport, Transport};
pub use providers::{SiteDescriptor, SourceRegistry};
pub use search::SearchCredentials;
pub use types::{
    Expected, FetchOutcome, HttpResponse, LyricsError, LyricsRequest, PAGE_HEADERS, ScrapeOutcome,
};
