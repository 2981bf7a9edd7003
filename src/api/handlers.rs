//! The proxy handlers: one HTTP entry point per upstream.
//!
//! Each handler follows the same contract: validate required parameters
//! (400 with a descriptive message), resolve credentials (caller-supplied
//! over configured fallback), forward, and shape the answer per the source's
//! failure policy. Missing search credentials are not an error: the handler
//! short-circuits with a `noKey` empty result before any upstream call.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    core::{
        credentials::resolve,
        forward::{self, BING, BRAVE, GOOGLE},
        nicehash::{self, RelayRequest},
        reddit,
    },
    error::AppError,
    state::AppState,
};

use super::responses;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    q: Option<String>,
    key: Option<String>,
    count: Option<u32>,
}

/// Bing News Search v7 proxy (soft-fail).
pub(crate) async fn bing_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let Some(query) = present(params.q) else {
        return AppError::MissingParam("q").into_response();
    };
    let Some(key) = resolve(params.key.as_deref(), state.config.bing_api_key.as_deref()) else {
        return Json(forward::no_key_reply(&BING)).into_response();
    };

    let request = state
        .client
        .get(&state.config.bing_endpoint)
        .header("Ocp-Apim-Subscription-Key", key)
        .query(&[
            ("q", query),
            ("count", params.count.unwrap_or(20).to_string()),
            ("mkt", "en-US".to_string()),
        ]);

    Json(forward::run_search(&BING, request).await).into_response()
}

/// Brave news search proxy (soft-fail).
pub(crate) async fn brave_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let Some(query) = present(params.q) else {
        return AppError::MissingParam("q").into_response();
    };
    let Some(key) = resolve(params.key.as_deref(), state.config.brave_api_key.as_deref()) else {
        return Json(forward::no_key_reply(&BRAVE)).into_response();
    };

    let request = state
        .client
        .get(&state.config.brave_endpoint)
        .header("X-Subscription-Token", key)
        .header(reqwest::header::ACCEPT, "application/json")
        .query(&[
            ("q", query),
            ("count", params.count.unwrap_or(20).to_string()),
        ]);

    Json(forward::run_search(&BRAVE, request).await).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleQuery {
    q: Option<String>,
    key: Option<String>,
    cx: Option<String>,
    num: Option<u32>,
    #[serde(rename = "keyIndex")]
    key_index: Option<usize>,
}

/// Google Custom Search v1 proxy (soft-fail).
///
/// Credentials ride in the query string on this API. The configured fallback
/// is a key ring; the caller selects the slot with `keyIndex`.
pub(crate) async fn google_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GoogleQuery>,
) -> Response {
    let Some(query) = present(params.q) else {
        return AppError::MissingParam("q").into_response();
    };
    let ring_key = state
        .config
        .google_keys
        .select(params.key_index.unwrap_or(0));
    let Some(key) = resolve(params.key.as_deref(), ring_key) else {
        return Json(forward::no_key_reply(&GOOGLE)).into_response();
    };
    let Some(cx) = resolve(params.cx.as_deref(), state.config.google_cx.as_deref()) else {
        return Json(forward::no_key_reply(&GOOGLE)).into_response();
    };

    let request = state.client.get(&state.config.google_endpoint).query(&[
        ("key", key.to_string()),
        ("cx", cx.to_string()),
        ("q", query),
        ("num", params.num.unwrap_or(10).to_string()),
    ]);

    Json(forward::run_search(&GOOGLE, request).await).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct MexcQuery {
    endpoint: Option<String>,
    symbol: Option<String>,
    key: Option<String>,
    interval: Option<String>,
    limit: Option<u32>,
}

/// MEXC REST v3 proxy (hard-fail).
///
/// Market-data endpoints work without a key; when one resolves it is attached
/// as `X-MEXC-APIKEY`. Upstream failures surface as a 500 with a message;
/// the price widget is expected to handle this loudly.
pub(crate) async fn mexc_market(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MexcQuery>,
) -> Response {
    let Some(endpoint) = present(params.endpoint) else {
        return AppError::MissingParam("endpoint").into_response();
    };
    let Some(symbol) = present(params.symbol) else {
        return AppError::MissingParam("symbol").into_response();
    };

    let url = format!(
        "{}/{}",
        state.config.mexc_endpoint.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );

    let mut query = vec![("symbol", symbol)];
    if let Some(interval) = present(params.interval) {
        query.push(("interval", interval));
    }
    if let Some(limit) = params.limit {
        query.push(("limit", limit.to_string()));
    }

    let mut request = state.client.get(&url).query(&query);
    if let Some(key) = resolve(params.key.as_deref(), state.config.mexc_api_key.as_deref()) {
        request = request.header("X-MEXC-APIKEY", key);
    }

    match fetch_mexc(request).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn fetch_mexc(request: reqwest::RequestBuilder) -> crate::error::Result<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("mexc request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "mexc returned {}: {}",
            status, detail
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| AppError::Upstream(format!("mexc returned an unparseable body: {}", e)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RedditQuery {
    q: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    limit: Option<u32>,
    sort: Option<String>,
    t: Option<String>,
}

/// Reddit search proxy (soft-fail, optional OAuth path).
pub(crate) async fn reddit_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RedditQuery>,
) -> Response {
    let Some(query) = present(params.q) else {
        return AppError::MissingParam("q").into_response();
    };

    let search = reddit::SearchParams {
        query: &query,
        limit: params.limit.unwrap_or(25),
        sort: params.sort.as_deref().unwrap_or("new"),
        time: params.t.as_deref().unwrap_or("week"),
        client_id: params.client_id.as_deref(),
        client_secret: params.client_secret.as_deref(),
    };

    Json(reddit::search(&state, &search).await).into_response()
}

/// NiceHash relay (POST only, status passthrough).
pub(crate) async fn nicehash_relay(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RelayRequest>,
) -> Response {
    match nicehash::relay(&state, &request).await {
        Ok(upstream) => responses::passthrough(upstream),
        Err(e) => e.into_response(),
    }
}

/// Solo-order summaries: relays the supplied orders request, then aggregates
/// the payload into display-ready packages.
pub(crate) async fn nicehash_orders(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RelayRequest>,
) -> Response {
    match nicehash::fetch_orders(&state, &request, Utc::now()).await {
        Ok(summaries) => Json(summaries).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Explicit 405 for anything but POST on the relay routes.
pub(crate) async fn nicehash_method_not_allowed() -> Response {
    AppError::MethodNotAllowed("nicehash relay accepts POST only".to_string()).into_response()
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct QrRequest {
    url: Option<String>,
    body: Option<Value>,
}

/// QR generation passthrough: POSTs the supplied body to the caller-specified
/// generator and mirrors the answer, serving SVG markup on success.
pub(crate) async fn qr_generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QrRequest>,
) -> Response {
    let Some(url) = present(request.url) else {
        return AppError::MissingParam("url").into_response();
    };
    let Some(body) = request.body else {
        return AppError::MissingParam("body").into_response();
    };

    let payload = match body {
        Value::String(s) => s,
        other => match serde_json::to_string(&other) {
            Ok(s) => s,
            Err(e) => return AppError::Json(e).into_response(),
        },
    };

    let upstream = state
        .client
        .post(&url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await;

    let response = match upstream {
        Ok(resp) => resp,
        Err(e) => return AppError::Http(e).into_response(),
    };

    let status = response.status();
    if status.is_success() {
        match response.text().await {
            Ok(markup) => responses::svg(markup),
            Err(e) => AppError::Http(e).into_response(),
        }
    } else {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await.unwrap_or_default();
        responses::passthrough(nicehash::RelayResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

// Treats blank strings the same as absent parameters.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
