//! Parameterized search forwarder.
//!
//! The search proxies differ only in endpoint, credential placement, and the
//! key their result array lives under, so the shared plumbing is driven by a
//! small per-source configuration table instead of duplicated handlers. Each
//! source also names its failure policy explicitly; the old implicit drift
//! between "swallow and return empty" and "fail loudly" is now a deliberate
//! per-dependency choice.

use serde_json::{json, Map, Value};

/// How a proxy responds when its upstream call fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// HTTP 200 with an empty result shape plus an `error` string, so a
    /// dependent UI never needs a failure branch for this source
    Soft,
    /// Propagate as a 5xx error response
    Hard,
    /// Forward the upstream status code and body verbatim
    Passthrough,
}

/// Static description of one search-style upstream.
#[derive(Clone, Copy, Debug)]
pub struct SearchSource {
    /// Short name used in logs and error strings
    pub name: &'static str,
    /// Dotted path to the result collection in the upstream payload,
    /// e.g. `"value"` for Bing or `"data.children"` for Reddit
    pub results_key: &'static str,
    /// Failure shaping policy for this source
    pub policy: FailurePolicy,
}

/// Bing News Search v7: results under `value`.
pub const BING: SearchSource = SearchSource {
    name: "bing",
    results_key: "value",
    policy: FailurePolicy::Soft,
};

/// Brave news search: results under `results`.
pub const BRAVE: SearchSource = SearchSource {
    name: "brave",
    results_key: "results",
    policy: FailurePolicy::Soft,
};

/// Google Custom Search v1: results under `items`.
pub const GOOGLE: SearchSource = SearchSource {
    name: "google",
    results_key: "items",
    policy: FailurePolicy::Soft,
};

/// Reddit search: results under `data.children`.
pub const REDDIT: SearchSource = SearchSource {
    name: "reddit",
    results_key: "data.children",
    policy: FailurePolicy::Soft,
};

/// Build the empty result body for a source, optionally carrying an `error`
/// string describing what went wrong upstream.
pub fn empty_reply(source: &SearchSource, error: Option<String>) -> Value {
    let mut body = shell_with_empty_results(source.results_key);
    if let (Some(reason), Some(map)) = (error, body.as_object_mut()) {
        map.insert("error".to_string(), json!(reason));
    }
    body
}

/// Empty result body marking that no credential was available at all.
pub fn no_key_reply(source: &SearchSource) -> Value {
    let mut body = shell_with_empty_results(source.results_key);
    if let Some(map) = body.as_object_mut() {
        map.insert("noKey".to_string(), json!(true));
    }
    body
}

/// Issue a prepared upstream request for a soft-fail source.
///
/// Any failure along the way (transport error, non-2xx status, non-JSON body)
/// collapses into the source's empty shape; the caller always gets a value it
/// can hand straight back with HTTP 200.
pub async fn run_search(source: &SearchSource, request: reqwest::RequestBuilder) -> Value {
    // This path implements the soft policy; passthrough sources go through
    // the relay plumbing instead.
    debug_assert!(source.policy == FailurePolicy::Soft);

    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            log::warn!("{} upstream unreachable: {}", source.name, e);
            return empty_reply(source, Some(format!("{} request failed: {}", source.name, e)));
        }
    };

    let status = response.status();
    if !status.is_success() {
        log::warn!("{} upstream returned {}", source.name, status);
        return empty_reply(
            source,
            Some(format!("{} upstream returned {}", source.name, status)),
        );
    }

    match response.json::<Value>().await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("{} returned unparseable body: {}", source.name, e);
            return empty_reply(
                source,
                Some(format!("{} returned an unparseable body", source.name)),
            );
        }
    }
}

// Builds `{ "a": { "b": [] } }` from a dotted path "a.b".
fn shell_with_empty_results(path: &str) -> Value {
    let mut value = json!([]);
    for segment in path.rsplit('.') {
        let mut map = Map::new();
        map.insert(segment.to_string(), value);
        value = Value::Object(map);
    }
    value
}
