use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One block-reward payout record nested under a solo order.
///
/// The upstream payload is loosely typed: amounts may arrive as JSON numbers
/// or as strings, so every numeric field goes through a lenient deserializer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardEntry {
    /// Payout amount denominated in the reference currency (BTC)
    #[serde(deserialize_with = "lenient_f64")]
    pub btc_amount: f64,
    /// Whether the payout has been fully confirmed and deposited
    pub deposit_complete: bool,
    /// Confirmations observed so far
    #[serde(deserialize_with = "lenient_u32")]
    pub confirmations: u32,
    /// Confirmations required before the deposit completes
    #[serde(deserialize_with = "lenient_u32")]
    pub required_confirmations: u32,
}

/// A descriptor that upstreams send either as a bare string or as a tagged
/// object (`"KHEAVYHASH"` vs `{ "algorithm": "KHEAVYHASH", "title": "..." }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Descriptor {
    /// Bare string form
    Plain(String),
    /// Tagged object form
    Tagged {
        /// Machine-readable code
        #[serde(default, alias = "algorithm", alias = "code")]
        id: Option<String>,
        /// Human-readable title
        #[serde(default)]
        title: Option<String>,
    },
}

impl Descriptor {
    /// The machine-readable code, whichever form the upstream chose.
    pub fn code(&self) -> Option<&str> {
        match self {
            Descriptor::Plain(s) => Some(s.as_str()),
            Descriptor::Tagged { id, .. } => id.as_deref(),
        }
    }

    /// The display title, if the upstream supplied one.
    pub fn title(&self) -> Option<&str> {
        match self {
            Descriptor::Plain(_) => None,
            Descriptor::Tagged { title, .. } => title.as_deref(),
        }
    }
}

/// Pool descriptor attached to a solo order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolDescriptor {
    /// Display name of the pool
    pub name: Option<String>,
    /// Stratum host, when present
    pub host: Option<String>,
}

/// A solo-mining purchase record as returned by the upstream orders API.
///
/// Every field is defaulted: records with missing fields still parse, and the
/// aggregation routine derives what it can from whatever is present.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SoloOrder {
    /// Order identifier (string or number upstream)
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// Package display name
    pub package_name: Option<String>,
    /// Primary mined coin symbol
    pub main_coin: Option<String>,
    /// Secondary (merge-mined) coin symbol
    pub second_coin: Option<String>,
    /// Block-reward payout records
    pub rewards: Vec<RewardEntry>,
    /// Package price in the reference currency
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub package_price: Option<f64>,
    /// Generic amount field, used as a price fallback
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub amount: Option<f64>,
    /// Algorithm descriptor (string or tagged object)
    pub algorithm: Option<Descriptor>,
    /// Pool descriptor
    pub pool: Option<PoolDescriptor>,
    /// Unit the hashrate limit is displayed in, e.g. `"TH"`
    pub display_market_factor: Option<String>,
    /// Purchased hashrate limit, in display-market-factor units
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub limit: Option<f64>,
    /// Package start time (RFC 3339 string or epoch milliseconds)
    #[serde(deserialize_with = "lenient_timestamp")]
    pub start_ts: Option<DateTime<Utc>>,
    /// Package end time (RFC 3339 string or epoch milliseconds)
    #[serde(deserialize_with = "lenient_timestamp")]
    pub end_ts: Option<DateTime<Utc>>,
    /// Whether the package is currently live
    pub alive: bool,
    /// Package type code, e.g. solo vs team
    #[serde(rename = "type")]
    pub package_type: Option<Descriptor>,
    /// Upstream sort index
    pub sort_index: Option<i64>,
    /// Package duration in hours
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub duration: Option<f64>,
}

/// Display-ready summary of one solo-mining package.
///
/// Recomputed on every fetch and never persisted; the raw upstream record is
/// retained under `raw` for traceability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    /// Order identifier
    pub id: String,
    /// Package display name
    pub name: String,
    /// Primary mined coin symbol
    pub main_coin: String,
    /// Secondary mined coin symbol, when merge-mined
    pub second_coin: Option<String>,
    /// Human-readable mining-type label ("Solo" / "Team")
    pub mining_type: String,
    /// Crypto-denominated reward: per-coin block reward times blocks found
    pub reward: f64,
    /// Cumulative reference-currency earnings across all positive payouts
    pub btc_earnings: f64,
    /// Count of fully confirmed blocks
    pub confirmed_blocks: u32,
    /// Count of blocks still awaiting confirmations
    pub pending_blocks: u32,
    /// confirmed + pending
    pub total_blocks: u32,
    /// Whether any block has been found at all
    pub block_found: bool,
    /// Algorithm identifier
    pub algorithm: String,
    /// Algorithm display name
    pub algorithm_name: String,
    /// Formatted hashrate label, e.g. "2.50 TH/s"
    pub hashrate: String,
    /// Human-readable time-remaining label
    pub time_remaining: String,
    /// Completion fraction in `0.0..=1.0`
    pub progress: f64,
    /// Whether this is a team package rather than a solo one
    pub is_team: bool,
    /// Price spent on the package, in the reference currency
    pub price_spent: f64,
    /// Whether the package is still active
    pub active: bool,
    /// Package start time
    pub start_ts: Option<DateTime<Utc>>,
    /// Package end time
    pub end_ts: Option<DateTime<Utc>>,
    /// Pool display name
    pub pool_name: String,
    /// Upstream sort index
    pub sort_index: Option<i64>,
    /// Package duration in hours
    pub duration: Option<f64>,
    /// The original order record, unmodified
    pub raw: Value,
}

// Lenient field decoders. The upstream mixes numbers, numeric strings, and
// missing fields freely across API versions.

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_f64(deserializer)?.unwrap_or(0.0))
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    })
}
