use std::process::ExitCode;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use lyricsweep::lyrics::SearchCredentials;
use lyricsweep::pipeline::{LANGUAGE_KEY, LYRICS_KEY};
use lyricsweep::{
    LyricsFetcher, LyricsPipeline, LyricsRequest, MetadataStore, ProcessOutcome, Settings,
    TrackTags, normalize,
};
use tracing_subscriber::EnvFilter;

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// A lyrics page URL, or ARTIST TITLE [LANGUAGE]
    #[arg(value_name = "URL | ARTIST TITLE [LANGUAGE]", required = true, num_args = 1..=3)]
    args: Vec<String>,
    /// Search API key for the fallback search.
    /// If unset, the LYRICSWEEP_SEARCH_KEY env var is used.
    #[arg(long)]
    search_key: Option<String>,
    /// Search engine id for the fallback search.
    /// If unset, the LYRICSWEEP_SEARCH_ENGINE env var is used.
    #[arg(long)]
    search_engine: Option<String>,
    /// Seconds a host is skipped after answering 429
    #[arg(long, value_name = "SECS")]
    rate_limit_cooldown: Option<u64>,
    /// Seconds a host is skipped after any other failure
    #[arg(long, value_name = "SECS")]
    failure_cooldown: Option<u64>,
    /// Detector confidence above which the detected language replaces the given one
    #[arg(long, value_name = "0.0-1.0")]
    detect_threshold: Option<f64>,
    /// Print the scraped text without normalizing it
    #[arg(long)]
    raw: bool,
    /// Enable backend logging to stderr
    #[arg(long)]
    pub debug_log: bool,
}

fn init_tracing(debug: bool) {
    let default = if debug { "lyricsweep=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn settings(cfg: &Config) -> Settings {
    let mut settings = Settings::from_env()
        .with_cooldowns(cfg.rate_limit_cooldown, cfg.failure_cooldown);
    if let (Some(api_key), Some(engine_id)) = (&cfg.search_key, &cfg.search_engine) {
        settings.search = Some(SearchCredentials {
            api_key: api_key.clone(),
            engine_id: engine_id.clone(),
        });
    }
    if let Some(threshold) = cfg.detect_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            Config::command()
                .error(ErrorKind::ValueValidation, "--detect-threshold must be between 0 and 1")
                .exit();
        }
        settings.detection_threshold = threshold;
    }
    settings
}

fn is_url(s: &str) -> bool {
    reqwest::Url::parse(s).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = Config::parse();
    init_tracing(cfg.debug_log);

    let settings = settings(&cfg);
    let fetcher = Arc::new(LyricsFetcher::from_settings(&settings));

    let lyrics = match cfg.args.as_slice() {
        [url] => {
            if !is_url(url) {
                Config::command()
                    .error(
                        ErrorKind::InvalidValue,
                        "a single argument must be an http(s) URL; otherwise give ARTIST TITLE",
                    )
                    .exit();
            }
            let raw = fetcher.fetch_url(url).await;
            if cfg.raw { raw } else { normalize(&raw) }
        }
        [artist, title, rest @ ..] => {
            if cfg.raw {
                let request = LyricsRequest::new(artist.as_str(), title.as_str());
                fetcher.fetch(&request).await
            } else {
                let mut tags = TrackTags::new().with("artist", artist).with("title", title);
                if let Some(language) = rest.first() {
                    tags.set(LANGUAGE_KEY, language);
                }
                let pipeline = LyricsPipeline::from_settings(fetcher.clone(), &settings);
                match pipeline.process(&mut tags, true).await {
                    ProcessOutcome::NoLyrics => String::new(),
                    outcome => {
                        let language = tags.get(LANGUAGE_KEY).unwrap_or_else(|| "und".into());
                        tracing::info!(outcome = ?outcome, language = %language, "Processed");
                        tags.get(LYRICS_KEY).unwrap_or_default()
                    }
                }
            }
        }
        _ => Config::command()
            .error(ErrorKind::WrongNumberOfValues, "expected URL or ARTIST TITLE [LANGUAGE]")
            .exit(),
    };

    if lyrics.trim().is_empty() {
        eprintln!("No lyrics found");
        return ExitCode::FAILURE;
    }
    println!("{lyrics}");
    ExitCode::SUCCESS
}
