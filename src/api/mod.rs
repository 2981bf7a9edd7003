//! API module for handling HTTP requests and responses

#[cfg(feature = "web")]
pub mod handlers;
#[cfg(feature = "web")]
pub(crate) mod responses;

#[cfg(feature = "web")]
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
#[cfg(feature = "web")]
use std::sync::Arc;
#[cfg(feature = "web")]
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
#[cfg(feature = "web")]
use crate::state::{AppState, Config};

#[cfg(feature = "web")]
use handlers::*;

#[cfg(feature = "web")]
/// Create the application router with all proxy routes.
///
/// Every route gets permissive CORS (wildcard origin, explicit method and
/// header allow-lists) except the NiceHash relay, which is mounted without a
/// CORS layer: the client never preflights it and non-POST calls get an
/// explicit 405.
pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    // Wildcard origin, explicit allow-lists
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let cors_routes = Router::new()
        // Public health check
        .route("/api/health", get(health_check))
        // Search proxies (soft-fail)
        .route("/api/bing", get(bing_news))
        .route("/api/brave", get(brave_news))
        .route("/api/google", get(google_search))
        .route("/api/reddit", get(reddit_search))
        // Exchange proxy (hard-fail)
        .route("/api/mexc", get(mexc_market))
        // QR generation passthrough
        .route("/api/qrcode", post(qr_generate))
        .layer(cors);

    // No CORS here: the relay rejects anything but POST outright.
    let relay_routes = Router::new()
        .route(
            "/api/nicehash",
            post(nicehash_relay).fallback(nicehash_method_not_allowed),
        )
        .route(
            "/api/nicehash/orders",
            post(nicehash_orders).fallback(nicehash_method_not_allowed),
        );

    Router::new()
        .merge(cors_routes)
        .merge(relay_routes)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
}
