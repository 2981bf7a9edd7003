//! Small formatting helpers shared across the gateway.

/// Format a purchased hashrate limit for display, e.g. `"2.50 TH/s"`.
///
/// The market factor is the display unit the upstream chose (`"TH"`, `"GH"`,
/// ...); absent values default to `"TH"`. An absent limit yields an empty
/// label so the UI can hide the field.
pub(crate) fn format_hashrate(limit: Option<f64>, market_factor: Option<&str>) -> String {
    let Some(limit) = limit else {
        return String::new();
    };
    let unit = market_factor
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or("TH");
    format!("{:.2} {}/s", limit, unit)
}

/// Normalize a coin symbol for lookups and display.
pub(crate) fn normalize_coin(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hashrate() {
        assert_eq!(format_hashrate(Some(2.5), Some("TH")), "2.50 TH/s");
        assert_eq!(format_hashrate(Some(100.0), Some("GH")), "100.00 GH/s");
        assert_eq!(format_hashrate(Some(1.0), None), "1.00 TH/s");
        assert_eq!(format_hashrate(Some(1.0), Some("  ")), "1.00 TH/s");
        assert_eq!(format_hashrate(None, Some("TH")), "");
    }

    #[test]
    fn test_normalize_coin() {
        assert_eq!(normalize_coin(" kas "), "KAS");
        assert_eq!(normalize_coin("BTC"), "BTC");
    }
}
