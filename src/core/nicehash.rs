//! NiceHash API v2 relay.
//!
//! The client signs its own NiceHash requests (the v2 scheme signs the full
//! header set), so the gateway forwards endpoint, method, headers, and body
//! exactly as supplied and hands the upstream status and body back verbatim.
//! The only failure the relay itself produces is a transport-level one.

use std::collections::HashMap;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::core::orders::aggregate_orders;
use crate::error::{AppError, Result};
use crate::models::order::PackageSummary;
use crate::state::AppState;

/// A relay request as posted by the client.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RelayRequest {
    /// API path, e.g. `/main/api/v2/hashpower/myOrders`
    pub endpoint: Option<String>,
    /// HTTP method for the upstream call
    pub method: Option<String>,
    /// Headers to forward exactly as given (the caller pre-signs these)
    pub headers: Option<HashMap<String, String>>,
    /// Optional JSON body, forwarded stringified
    pub body: Option<Value>,
}

/// Raw upstream answer: status and body verbatim, plus the content type so
/// the wire response can mirror it.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    /// Upstream HTTP status code
    pub status: u16,
    /// Upstream content type, when present
    pub content_type: Option<String>,
    /// Upstream body bytes, untouched
    pub body: Bytes,
}

impl RelayResponse {
    /// Whether the upstream answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Validate a relay request and forward it to the NiceHash API.
///
/// Missing required fields yield `MissingParam`; a transport failure yields
/// `Http`. Upstream error statuses are NOT errors here: they travel back to
/// the caller inside the `RelayResponse`.
pub async fn relay(state: &AppState, request: &RelayRequest) -> Result<RelayResponse> {
    let endpoint = required(&request.endpoint, "endpoint")?;
    let method_name = required(&request.method, "method")?;
    let headers = request
        .headers
        .as_ref()
        .ok_or(AppError::MissingParam("headers"))?;

    let method = Method::from_str(&method_name.to_ascii_uppercase())
        .map_err(|_| AppError::InvalidInput(format!("unsupported method: {}", method_name)))?;

    let url = format!(
        "{}/{}",
        state.config.nicehash_endpoint.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );

    let mut upstream = state.client.request(method, &url);
    for (name, value) in headers {
        upstream = upstream.header(name.as_str(), value.as_str());
    }
    if let Some(body) = &request.body {
        upstream = upstream.body(serde_json::to_string(body)?);
    }

    log::debug!("relaying to nicehash: {}", url);
    let response = upstream.send().await?;

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = response.bytes().await?;

    Ok(RelayResponse {
        status,
        content_type,
        body,
    })
}

/// Fetch a solo-order list through the relay and aggregate it into package
/// summaries.
///
/// Any failure along the way (transport, a non-2xx upstream status, an
/// unparseable body, a malformed record) aborts the whole routine and
/// propagates; there is no partial-result path.
pub async fn fetch_orders(
    state: &AppState,
    request: &RelayRequest,
    now: DateTime<Utc>,
) -> Result<Vec<PackageSummary>> {
    let response = relay(state, request).await?;
    if !response.is_success() {
        return Err(AppError::Upstream(format!(
            "nicehash orders endpoint returned {}",
            response.status
        )));
    }

    let payload: Value = serde_json::from_slice(&response.body)?;
    aggregate_orders(&payload, now)
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingParam(name))
}
