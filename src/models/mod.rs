//! Data model for upstream payloads and derived summaries

/// Solo orders, reward entries, and package summaries.
pub mod order;
