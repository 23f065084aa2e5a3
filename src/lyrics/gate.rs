//! Request gate: every outbound request goes through a per-host failure
//! cache so a host that just failed is left alone for a while.
//!
//! One failure silences a host for a bounded window instead of retrying:
//! an hour after a rate-limit response, a minute after anything else.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::lyrics::types::{FetchOutcome, HttpResponse, LyricsError, http_client};

const RATE_LIMITED: u16 = 429;

/// Issues one HTTP GET. The production implementation is [`ReqwestTransport`];
/// tests substitute canned responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, LyricsError>;
}

/// Transport backed by the shared `reqwest` client.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReqwestTransport;

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, LyricsError> {
        let mut req = http_client().get(url);
        if !params.is_empty() {
            req = req.query(params);
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// How long a failed host is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub rate_limit_cooldown: Duration,
    pub failure_cooldown: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            rate_limit_cooldown: Duration::from_secs(3600),
            failure_cooldown: Duration::from_secs(60),
        }
    }
}

impl BackoffPolicy {
    fn cooldown_for(&self, record: &HostFailureRecord) -> Duration {
        if record.is_rate_limit() {
            self.rate_limit_cooldown
        } else {
            self.failure_cooldown
        }
    }
}

/// Last failure seen for a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFailureRecord {
    pub host: String,
    pub timestamp: Instant,
    /// `None` when the request never produced a status (connection error, timeout).
    pub status: Option<u16>,
}

impl HostFailureRecord {
    pub fn is_rate_limit(&self) -> bool {
        self.status == Some(RATE_LIMITED)
    }
}

/// Host → last failure. Shared by every concurrent fetch of one fetcher.
#[derive(Debug, Default)]
pub struct FailureCache {
    policy: BackoffPolicy,
    records: Mutex<HashMap<String, HostFailureRecord>>,
}

impl FailureCache {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the blocking record while `host` is cooling down. A record whose
    /// window has passed is purged here.
    pub fn check(&self, host: &str) -> Option<HostFailureRecord> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let record = records.get(host)?;
        if record.timestamp.elapsed() < self.policy.cooldown_for(record) {
            return Some(record.clone());
        }
        records.remove(host);
        None
    }

    pub fn record(&self, host: &str, status: Option<u16>) {
        let record = HostFailureRecord {
            host: host.to_string(),
            timestamp: Instant::now(),
            status,
        };
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(host.to_string(), record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub(crate) fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
}

/// Single-attempt GET with memoized per-host backoff.
#[derive(Clone)]
pub struct RequestGate {
    transport: Arc<dyn Transport>,
    failures: Arc<FailureCache>,
}

impl RequestGate {
    pub fn new(transport: Arc<dyn Transport>, policy: BackoffPolicy) -> Self {
        Self {
            transport,
            failures: Arc::new(FailureCache::new(policy)),
        }
    }

    pub fn failures(&self) -> &FailureCache {
        &self.failures
    }

    pub async fn get(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> FetchOutcome {
        let Some(host) = host_of(url) else {
            tracing::debug!(url, "Skipping request to URL without a host");
            return FetchOutcome::TransientFailure { status: None };
        };

        if let Some(record) = self.failures.check(&host) {
            tracing::debug!(host = %host, status = ?record.status, "Host cooling down, request skipped");
            return FetchOutcome::CoolingDown(record);
        }

        match self.transport.get(url, params, headers).await {
            Ok(resp) if resp.status == 200 => FetchOutcome::Fetched(resp),
            Ok(resp) if resp.status == RATE_LIMITED => {
                tracing::warn!(host = %host, "Rate limited, backing off");
                self.failures.record(&host, Some(RATE_LIMITED));
                FetchOutcome::RateLimited
            }
            Ok(resp) => {
                tracing::debug!(host = %host, status = resp.status, "Request failed");
                self.failures.record(&host, Some(resp.status));
                FetchOutcome::TransientFailure {
                    status: Some(resp.status),
                }
            }
            Err(e) => {
                tracing::debug!(host = %host, error = %e, "Request failed");
                self.failures.record(&host, None);
                FetchOutcome::TransientFailure { status: None }
            }
        }
    }
}
