#![doc(html_root_url = "https://docs.rs/apirelay/0.1.0")]
#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

//! # ApiRelay
//!
//! A small HTTP gateway that forwards browser-originated requests to third-party
//! APIs (Bing News, Brave Search, Google Custom Search, MEXC, Reddit, NiceHash,
//! and a caller-specified QR generator), injecting server-held credentials and
//! normalizing upstream failures so a client UI degrades gracefully instead of
//! failing hard.
//!
//! ## Features
//!
//! - **Credential injection**: caller-supplied keys take precedence over
//!   environment-configured fallbacks; search sources degrade to an explicit
//!   `noKey` empty result when neither is present
//! - **Uniform CORS**: wildcard origin with explicit method/header allow-lists
//!   on every route except the NiceHash relay
//! - **Policy-driven error shaping**: each upstream carries a named failure
//!   policy (soft-fail, hard-fail, status passthrough) instead of ad-hoc drift
//! - **Solo-order aggregation**: NiceHash solo-mining orders are reduced to
//!   display-ready package summaries (block counts, earnings, progress)
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! apirelay = { version = "0.1", features = ["full"] }
//! ```
//!
//! Aggregating an already-fetched order payload:
//! ```rust,no_run
//! use apirelay::{aggregate_orders, Result};
//!
//! fn main() -> Result<()> {
//!     let payload = serde_json::json!({ "list": [] });
//!     let summaries = aggregate_orders(&payload, chrono::Utc::now())?;
//!     println!("{} packages", summaries.len());
//!     Ok(())
//! }
//! ```

// Internal modules
pub mod api;
pub mod core;
/// Defines the application's error types and result aliases.
pub mod error;
pub mod models;
mod state;
mod utils;

// Public API exports
pub use crate::{
    core::orders::aggregate_orders,
    error::{AppError, Result, ResultExt},
    models::order::{PackageSummary, RewardEntry, SoloOrder},
    state::{AppState, Config},
};

#[cfg(feature = "web")]
pub use crate::api::{create_router, handlers::health_check};

/// Build-time metadata generated by the `built` crate.
#[allow(missing_docs, unreachable_pub)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Initialize the application with default settings
///
/// This function sets up logging. It should be called early in the
/// application startup process, before any handler runs.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
///
/// # Example
///
/// ```no_run
/// use apirelay::init;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     init()?;
///     // Application code here
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    // Initialize logging with sensible defaults
    let env = env_logger::Env::default()
        .default_filter_or("info")
        .default_write_style_or("auto");

    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .map_err(|e| error::AppError::Internal(format!("logger init failed: {}", e)))?;

    log::info!("Initializing ApiRelay {}", built_info::PKG_VERSION);
    Ok(())
}
