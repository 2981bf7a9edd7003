//! Reddit search with an OAuth client-credentials path.
//!
//! When a client id/secret pair is available the proxy exchanges it for a
//! bearer token and searches through the authenticated API host; otherwise
//! (or when the exchange fails) it degrades to the public JSON host, which
//! carries a much stricter implicit rate limit. The chosen path is reported
//! back to the caller under `_meta`.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::credentials::resolve;
use crate::core::forward::{self, REDDIT};
use crate::error::{AppError, Result};
use crate::state::AppState;

const USER_AGENT: &str = concat!("apirelay/", env!("CARGO_PKG_VERSION"));

/// Query parameters for one Reddit search.
#[derive(Debug, Clone)]
pub struct SearchParams<'a> {
    /// Search query string
    pub query: &'a str,
    /// Maximum number of results
    pub limit: u32,
    /// Sort order (`new`, `hot`, `relevance`, ...)
    pub sort: &'a str,
    /// Time window (`hour`, `day`, `week`, ...)
    pub time: &'a str,
    /// Caller-supplied OAuth client id, taking precedence over configuration
    pub client_id: Option<&'a str>,
    /// Caller-supplied OAuth client secret
    pub client_secret: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TokenReply {
    access_token: Option<String>,
}

/// Exchange a client id/secret for a bearer token (client-credentials grant).
pub async fn exchange_token(
    client: &reqwest::Client,
    oauth_endpoint: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String> {
    let response = client
        .post(oauth_endpoint)
        .basic_auth(client_id, Some(client_secret))
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| AppError::TokenExchange(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::TokenExchange(format!(
            "token endpoint returned {}",
            status
        )));
    }

    let reply: TokenReply = response
        .json()
        .await
        .map_err(|e| AppError::TokenExchange(e.to_string()))?;

    reply
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::TokenExchange("reply carried no access_token".to_string()))
}

/// Run a Reddit search, preferring the authenticated host.
///
/// Never fails on the wire: upstream problems (including a non-JSON body,
/// the usual symptom of public-host rate limiting) collapse into the empty
/// soft-fail shape. The `_meta` object always reports which path served the
/// request.
pub async fn search(state: &AppState, params: &SearchParams<'_>) -> Value {
    let config = &state.config;
    let client_id = resolve(params.client_id, config.reddit_client_id.as_deref());
    let client_secret = resolve(params.client_secret, config.reddit_client_secret.as_deref());

    let token = match (client_id, client_secret) {
        (Some(id), Some(secret)) => {
            match exchange_token(&state.client, &config.reddit_oauth_endpoint, id, secret).await {
                Ok(token) => Some(token),
                Err(e) => {
                    log::warn!("reddit token exchange failed, using public host: {}", e);
                    None
                }
            }
        }
        _ => None,
    };

    let authenticated = token.is_some();
    let host = if authenticated {
        config.reddit_api_host.clone()
    } else {
        config.reddit_public_host.clone()
    };

    let url = if authenticated {
        format!("{}/search", host)
    } else {
        format!("{}/search.json", host)
    };

    let query = [
        ("q", params.query.to_string()),
        ("limit", params.limit.to_string()),
        ("sort", params.sort.to_string()),
        ("t", params.time.to_string()),
    ];
    let mut request = state
        .client
        .get(&url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .query(&query);
    if let Some(token) = &token {
        request = request.bearer_auth(token);
    }

    let body = run_checked(request).await.unwrap_or_else(|reason| {
        log::warn!("reddit search degraded: {}", reason);
        forward::empty_reply(&REDDIT, Some(reason))
    });

    attach_meta(body, authenticated, &host)
}

// Like `forward::run_search`, with the extra content-type gate: the public
// host answers rate-limited callers with an HTML page and a 200 status.
async fn run_checked(request: reqwest::RequestBuilder) -> std::result::Result<Value, String> {
    let response = request
        .send()
        .await
        .map_err(|e| format!("reddit request failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("reddit upstream returned {}", status));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.contains("application/json") {
        let label = if content_type.is_empty() {
            "no content type"
        } else {
            content_type.as_str()
        };
        return Err(format!("reddit answered with {}, likely rate limited", label));
    }

    response
        .json::<Value>()
        .await
        .map_err(|_| "reddit returned an unparseable body".to_string())
}

/// Report the serving path back to the caller.
pub(crate) fn attach_meta(mut body: Value, authenticated: bool, host: &str) -> Value {
    if let Some(map) = body.as_object_mut() {
        map.insert(
            "_meta".to_string(),
            json!({ "authenticated": authenticated, "host": host }),
        );
        body
    } else {
        json!({
            "data": { "children": [] },
            "_meta": { "authenticated": authenticated, "host": host },
        })
    }
}
