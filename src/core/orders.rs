//! Solo-order aggregation: reduces a loosely-typed order list into
//! display-ready package summaries.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::core::mining;
use crate::error::{AppError, Result};
use crate::models::order::{PackageSummary, SoloOrder};
use crate::utils::format_hashrate;

/// Reduce an upstream orders payload into one `PackageSummary` per order.
///
/// Accepts either a bare JSON array of order records or an object carrying
/// the array under a `list` field. Input order and count are preserved: N
/// orders in, N summaries out. Any malformed record aborts the whole routine;
/// there is no partial-result path.
pub fn aggregate_orders(payload: &Value, now: DateTime<Utc>) -> Result<Vec<PackageSummary>> {
    let list = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get("list")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                AppError::InvalidInput("orders payload has no list field".to_string())
            })?,
        _ => {
            return Err(AppError::InvalidInput(
                "orders payload is neither an array nor an object".to_string(),
            ))
        }
    };

    list.iter().map(|raw| summarize(raw, now)).collect()
}

/// Derive a single package summary from one raw order record.
fn summarize(raw: &Value, now: DateTime<Utc>) -> Result<PackageSummary> {
    let order: SoloOrder = serde_json::from_value(raw.clone())?;

    // Block counts come strictly from reward entries with a positive payout.
    let mut confirmed_blocks = 0u32;
    let mut pending_blocks = 0u32;
    let mut btc_earnings = 0.0f64;
    for entry in order.rewards.iter().filter(|r| r.btc_amount > 0.0) {
        if entry.deposit_complete {
            confirmed_blocks += 1;
        } else {
            pending_blocks += 1;
        }
        btc_earnings += entry.btc_amount;
    }
    let total_blocks = confirmed_blocks + pending_blocks;
    let block_found = total_blocks > 0;

    let main_coin = order.main_coin.clone().unwrap_or_default();
    let reward = if block_found {
        mining::block_reward(&main_coin) * f64::from(total_blocks)
    } else {
        0.0
    };

    let price_spent = order.package_price.or(order.amount).unwrap_or(0.0);

    let pool_name = order
        .pool
        .as_ref()
        .and_then(|p| p.name.clone())
        .unwrap_or_default();
    let algorithm = mining::algorithm_info(
        order.algorithm.as_ref().and_then(|a| a.code()),
        order.pool.as_ref().and_then(|p| p.name.as_deref()),
    );

    let type_code = order
        .package_type
        .as_ref()
        .and_then(|t| t.code())
        .unwrap_or("")
        .to_ascii_uppercase();
    let is_team = type_code.contains("TEAM");
    let mining_type = if is_team { "Team" } else { "Solo" }.to_string();

    Ok(PackageSummary {
        id: order.id.clone(),
        name: order
            .package_name
            .clone()
            .unwrap_or_else(|| main_coin.clone()),
        second_coin: order.second_coin.clone(),
        mining_type,
        reward,
        btc_earnings,
        confirmed_blocks,
        pending_blocks,
        total_blocks,
        block_found,
        algorithm: algorithm.id,
        algorithm_name: algorithm.name,
        hashrate: format_hashrate(order.limit, order.display_market_factor.as_deref()),
        time_remaining: mining::time_remaining(order.end_ts, order.alive, now),
        progress: mining::progress(order.start_ts, order.end_ts, now),
        is_team,
        price_spent,
        active: order.alive,
        start_ts: order.start_ts,
        end_ts: order.end_ts,
        pool_name,
        sort_index: order.sort_index,
        duration: order.duration,
        main_coin,
        raw: raw.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn mixed_rewards_split_into_confirmed_and_pending() {
        let payload = json!([{
            "id": "ord-1",
            "mainCoin": "BTC",
            "rewards": [
                { "btcAmount": 0.001, "depositComplete": true },
                { "btcAmount": 0.0005, "depositComplete": false }
            ],
            "alive": true
        }]);

        let summaries = aggregate_orders(&payload, now()).unwrap();
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.confirmed_blocks, 1);
        assert_eq!(s.pending_blocks, 1);
        assert_eq!(s.total_blocks, 2);
        assert!(s.block_found);
        assert!((s.btc_earnings - 0.0015).abs() < 1e-12);
        assert!((s.reward - 3.125 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_payout_rewards_do_not_count_as_blocks() {
        let payload = json!({ "list": [{
            "id": "ord-2",
            "mainCoin": "LTC",
            "rewards": [
                { "btcAmount": 0.0, "depositComplete": true },
                { "btcAmount": 0, "depositComplete": false }
            ]
        }]});

        let summaries = aggregate_orders(&payload, now()).unwrap();
        let s = &summaries[0];
        assert_eq!(s.total_blocks, 0);
        assert_eq!(s.reward, 0.0);
        assert!(!s.block_found);
        assert_eq!(s.btc_earnings, 0.0);
    }

    #[test]
    fn order_and_count_are_preserved() {
        let payload = json!([
            { "id": "a" }, { "id": "b" }, { "id": "c" }
        ]);

        let summaries = aggregate_orders(&payload, now()).unwrap();
        let ids: Vec<_> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn price_falls_back_from_package_price_to_amount() {
        let payload = json!([
            { "id": "a", "packagePrice": 0.02, "amount": 0.09 },
            { "id": "b", "amount": 0.09 },
            { "id": "c" }
        ]);

        let summaries = aggregate_orders(&payload, now()).unwrap();
        assert_eq!(summaries[0].price_spent, 0.02);
        assert_eq!(summaries[1].price_spent, 0.09);
        assert_eq!(summaries[2].price_spent, 0.0);
    }

    #[test]
    fn team_type_code_flips_the_team_flag() {
        let payload = json!([
            { "id": "a", "type": "EP_TEAM" },
            { "id": "b", "type": { "code": "EP_SOLO" } }
        ]);

        let summaries = aggregate_orders(&payload, now()).unwrap();
        assert!(summaries[0].is_team);
        assert_eq!(summaries[0].mining_type, "Team");
        assert!(!summaries[1].is_team);
        assert_eq!(summaries[1].mining_type, "Solo");
    }

    #[test]
    fn raw_order_is_retained_unmodified() {
        let record = json!({ "id": "a", "mainCoin": "KAS", "extraField": [1, 2, 3] });
        let payload = json!([record.clone()]);

        let summaries = aggregate_orders(&payload, now()).unwrap();
        assert_eq!(summaries[0].raw, record);
    }

    #[test]
    fn non_list_payload_is_rejected() {
        assert!(aggregate_orders(&json!("nope"), now()).is_err());
        assert!(aggregate_orders(&json!({ "orders": [] }), now()).is_err());
    }
}
