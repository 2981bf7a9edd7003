//! Mining-domain lookups: block-reward constants, algorithm display info,
//! and time-remaining / progress derivation for solo packages.

use chrono::{DateTime, Utc};

use crate::utils::normalize_coin;

/// Protocol block subsidy for a mined coin, in that coin's own units.
///
/// Fixed constants for the coins the solo packages cover; values reflect the
/// current emission epoch. Unknown symbols yield 0.0, which propagates into a
/// zero crypto reward rather than an error.
pub fn block_reward(coin: &str) -> f64 {
    match normalize_coin(coin).as_str() {
        "BTC" => 3.125,
        "BCH" => 3.125,
        "LTC" => 6.25,
        "DOGE" => 10_000.0,
        "KAS" => 55.0,
        "ZEC" => 1.5625,
        "RVN" => 2_500.0,
        "ETC" => 2.048,
        "XMR" => 0.6,
        _ => 0.0,
    }
}

/// Resolved algorithm identity for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmInfo {
    /// Machine-readable identifier, e.g. `KHEAVYHASH`
    pub id: String,
    /// Human-readable name, e.g. `kHeavyHash`
    pub name: String,
}

/// Resolve algorithm display info from the order's algorithm code, falling
/// back to a heuristic over the pool name when the code is absent.
pub fn algorithm_info(code: Option<&str>, pool_name: Option<&str>) -> AlgorithmInfo {
    if let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) {
        let id = code.to_ascii_uppercase();
        let name = match id.as_str() {
            "SHA256" | "SHA256ASICBOOST" => "SHA-256",
            "SCRYPT" => "Scrypt",
            "KHEAVYHASH" => "kHeavyHash",
            "RANDOMX" | "RANDOMXMONERO" => "RandomX",
            "EQUIHASH" => "Equihash",
            "KAWPOW" => "KawPow",
            "ETCHASH" => "Etchash",
            "X11" => "X11",
            other => return AlgorithmInfo {
                id: id.clone(),
                name: title_case(other),
            },
        };
        return AlgorithmInfo {
            id,
            name: name.to_string(),
        };
    }

    let pool = pool_name.unwrap_or("").to_ascii_lowercase();
    let (id, name) = if pool.contains("kaspa") {
        ("KHEAVYHASH", "kHeavyHash")
    } else if pool.contains("scrypt") || pool.contains("litecoin") || pool.contains("doge") {
        ("SCRYPT", "Scrypt")
    } else if pool.contains("monero") {
        ("RANDOMX", "RandomX")
    } else {
        ("SHA256", "SHA-256")
    };
    AlgorithmInfo {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// Human-readable time left until `end`, e.g. `"3d 14h"`, `"5h 12m"`, `"42m"`.
///
/// Packages that are no longer alive, or whose end lies in the past, read
/// `"Completed"`; packages without an end timestamp read `"Unknown"`.
pub fn time_remaining(end: Option<DateTime<Utc>>, alive: bool, now: DateTime<Utc>) -> String {
    let Some(end) = end else {
        return "Unknown".to_string();
    };
    if !alive || end <= now {
        return "Completed".to_string();
    }

    let left = end - now;
    let days = left.num_days();
    let hours = left.num_hours() % 24;
    let minutes = left.num_minutes() % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes.max(1))
    }
}

/// Completion fraction of the package window, clamped to `0.0..=1.0`.
///
/// Missing or degenerate windows (no start, no end, end before start) report
/// 0.0 while the window has not closed and 1.0 once it has.
pub fn progress(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> f64 {
    match (start, end) {
        (Some(start), Some(end)) if end > start => {
            let total = (end - start).num_milliseconds() as f64;
            let elapsed = (now - start).num_milliseconds() as f64;
            (elapsed / total).clamp(0.0, 1.0)
        }
        (_, Some(end)) if end <= now => 1.0,
        _ => 0.0,
    }
}

fn title_case(code: &str) -> String {
    let lower = code.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => lower,
    }
}
