use serde::Deserialize;

use crate::language;
use crate::lyrics::gate::RequestGate;
use crate::lyrics::types::{FetchOutcome, LyricsError};

/// Google Custom Search, restricted to the engine's configured sites.
pub const SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1/siterestrict";

/// Languages the search backend accepts in `lr=lang_xx`, as it spells them.
const SEARCH_LANGUAGES: &[&str] = &[
    "ar", "bg", "ca", "cs", "da", "de", "el", "en", "es", "et", "fi", "fr", "hr", "hu", "id",
    "is", "it", "iw", "ja", "ko", "lt", "lv", "nl", "no", "pl", "pt", "ro", "ru", "sk", "sl",
    "sr", "sv", "tr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCredentials {
    pub api_key: String,
    pub engine_id: String,
}

#[derive(Deserialize, Debug, Default)]
struct SearchResponse {
    spelling: Option<Spelling>,
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Spelling {
    corrected_query: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SearchItem {
    link: String,
}

/// `lr` value for a canonical subtag, when the backend supports the language.
pub fn language_restriction(subtag: &str) -> Option<String> {
    let code = match language::to_search_code(subtag)? {
        "he" => "iw",
        other => other,
    };
    SEARCH_LANGUAGES
        .contains(&code)
        .then(|| format!("lang_{code}"))
}

/// Result links for `query`, best first. Follows one spelling correction; if
/// the corrected query fails or finds nothing, the first results stand.
pub async fn search_links(
    gate: &RequestGate,
    credentials: &SearchCredentials,
    query: &str,
    subtag: &str,
) -> Vec<String> {
    let restriction = language_restriction(subtag);
    let first = match query_once(gate, credentials, query, restriction.as_deref()).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::debug!(query, error = %e, "Search failed");
            return Vec::new();
        }
    };

    let corrected = first
        .spelling
        .as_ref()
        .and_then(|s| s.corrected_query.as_deref())
        .filter(|c| !c.is_empty() && *c != query);
    if let Some(corrected) = corrected {
        tracing::debug!(query, corrected, "Search suggested a correction");
        match query_once(gate, credentials, corrected, restriction.as_deref()).await {
            Ok(resp) if !resp.items.is_empty() => return links(resp),
            Ok(_) => {}
            Err(e) => tracing::debug!(query = corrected, error = %e, "Corrected search failed"),
        }
    }
    links(first)
}

fn links(resp: SearchResponse) -> Vec<String> {
    resp.items.into_iter().map(|item| item.link).collect()
}

async fn query_once(
    gate: &RequestGate,
    credentials: &SearchCredentials,
    query: &str,
    restriction: Option<&str>,
) -> Result<SearchResponse, LyricsError> {
    let mut params = vec![
        ("key", credentials.api_key.as_str()),
        ("cx", credentials.engine_id.as_str()),
        ("q", query),
    ];
    if let Some(lr) = restriction {
        params.push(("lr", lr));
    }

    match gate.get(SEARCH_URL, &params, &[]).await {
        FetchOutcome::Fetched(resp) => Ok(serde_json::from_str(&resp.body)?),
        other => Err(LyricsError::Api(format!("search: {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::gate::BackoffPolicy;
    use crate::lyrics::gate::testing::CannedTransport;
    use std::sync::Arc;

    fn credentials() -> SearchCredentials {
        SearchCredentials {
            api_key: "k".into(),
            engine_id: "c".into(),
        }
    }

    const BASE: &str = "https://www.googleapis.com/customsearch/v1/siterestrict?key=k&cx=c&q=";

    #[test]
    fn restriction_uses_backend_codes() {
        assert_eq!(language_restriction("eng").as_deref(), Some("lang_en"));
        assert_eq!(language_restriction("heb").as_deref(), Some("lang_iw"));
        assert_eq!(language_restriction("hin"), None);
        assert_eq!(language_restriction("und"), None);
    }

    #[tokio::test]
    async fn links_in_result_order() {
        let body = r#"{"items":[{"link":"https://a.example/1"},{"link":"https://b.example/2"}]}"#;
        let transport = Arc::new(CannedTransport::new().route(&format!("{BASE}queen x"), 200, body));
        let gate = RequestGate::new(transport.clone(), BackoffPolicy::default());

        let found = search_links(&gate, &credentials(), "queen x", "eng").await;
        assert_eq!(found, ["https://a.example/1", "https://b.example/2"]);
        assert_eq!(transport.requested(), [format!("{BASE}queen x&lr=lang_en")]);
    }

    #[tokio::test]
    async fn follows_one_spelling_correction() {
        let misspelled = r#"{"spelling":{"correctedQuery":"queen"},"items":[{"link":"https://a.example/miss"}]}"#;
        let corrected = r#"{"spelling":{"correctedQuery":"queens"},"items":[{"link":"https://a.example/hit"}]}"#;
        let transport = Arc::new(
            CannedTransport::new()
                .route(&format!("{BASE}quen"), 200, misspelled)
                .route(&format!("{BASE}queen"), 200, corrected),
        );
        let gate = RequestGate::new(transport.clone(), BackoffPolicy::default());

        let found = search_links(&gate, &credentials(), "quen", "und").await;
        assert_eq!(found, ["https://a.example/hit"]);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn failed_correction_keeps_first_results() {
        let misspelled = r#"{"spelling":{"correctedQuery":"queen"},"items":[{"link":"https://a.example/first"}]}"#;
        let transport = Arc::new(
            CannedTransport::new()
                .route(&format!("{BASE}quen"), 200, misspelled)
                .route(&format!("{BASE}queen"), 200, "not json"),
        );
        let gate = RequestGate::new(transport.clone(), BackoffPolicy::default());

        let found = search_links(&gate, &credentials(), "quen", "und").await;
        assert_eq!(found, ["https://a.example/first"]);
    }

    #[tokio::test]
    async fn backend_error_yields_nothing() {
        let transport = Arc::new(CannedTransport::new().route(BASE, 403, "{}"));
        let gate = RequestGate::new(transport, BackoffPolicy::default());
        assert!(search_links(&gate, &credentials(), "queen", "und").await.is_empty());
    }
}
