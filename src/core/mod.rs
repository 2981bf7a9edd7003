//! Core gateway functionality: credential resolution, upstream forwarding,
//! and the solo-order aggregation pipeline

/// Caller-over-fallback credential resolution and the explicit key ring.
pub mod credentials;
/// Parameterized search forwarding with per-source failure policies.
pub mod forward;
/// Mining-domain lookups: block rewards, algorithms, time labels.
pub mod mining;
/// NiceHash relay and order fetching.
pub mod nicehash;
/// Solo-order aggregation into package summaries.
pub mod orders;
/// Reddit search with the OAuth client-credentials path.
pub mod reddit;
