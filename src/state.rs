use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::core::credentials::KeyRing;
use crate::error::Result;

/// Configuration for the application
///
/// All credentials are optional: a missing key makes the corresponding search
/// source degrade to a `noKey` empty result rather than fail. Upstream
/// endpoints carry production defaults and can be overridden through the
/// environment, which the integration tests rely on.
#[derive(Clone, Debug)]
pub struct Config {
    /// Bing News Search v7 subscription key (`BING_API_KEY`)
    pub bing_api_key: Option<String>,
    /// Brave Search subscription token (`BRAVE_API_KEY`)
    pub brave_api_key: Option<String>,
    /// Google Custom Search keys (`GOOGLE_API_KEYS`, comma-separated, or
    /// `GOOGLE_API_KEY` for a single key); the caller picks the ring slot
    pub google_keys: KeyRing,
    /// Google Custom Search engine id (`GOOGLE_CSE_CX`)
    pub google_cx: Option<String>,
    /// MEXC API key (`MEXC_API_KEY`); market-data endpoints work unkeyed
    pub mexc_api_key: Option<String>,
    /// Reddit OAuth client id (`REDDIT_CLIENT_ID`)
    pub reddit_client_id: Option<String>,
    /// Reddit OAuth client secret (`REDDIT_CLIENT_SECRET`)
    pub reddit_client_secret: Option<String>,

    /// Bing News Search endpoint
    pub bing_endpoint: String,
    /// Brave news search endpoint
    pub brave_endpoint: String,
    /// Google Custom Search endpoint
    pub google_endpoint: String,
    /// MEXC REST v3 base URL
    pub mexc_endpoint: String,
    /// NiceHash API v2 base URL
    pub nicehash_endpoint: String,
    /// Reddit OAuth token endpoint
    pub reddit_oauth_endpoint: String,
    /// Reddit authenticated API host
    pub reddit_api_host: String,
    /// Reddit public (unauthenticated) host
    pub reddit_public_host: String,

    /// Socket address the server binds to (`LISTEN_ADDR`)
    pub listen_addr: SocketAddr,
    /// Outbound request timeout (`REQUEST_TIMEOUT_SECS`)
    pub request_timeout: Duration,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bing_api_key: None,
            brave_api_key: None,
            google_keys: KeyRing::default(),
            google_cx: None,
            mexc_api_key: None,
            reddit_client_id: None,
            reddit_client_secret: None,

            bing_endpoint: "https://api.bing.microsoft.com/v7.0/news/search".to_string(),
            brave_endpoint: "https://api.search.brave.com/res/v1/news/search".to_string(),
            google_endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            mexc_endpoint: "https://api.mexc.com/api/v3".to_string(),
            nicehash_endpoint: "https://api2.nicehash.com".to_string(),
            reddit_oauth_endpoint: "https://www.reddit.com/api/v1/access_token".to_string(),
            reddit_api_host: "https://oauth.reddit.com".to_string(),
            reddit_public_host: "https://www.reddit.com".to_string(),

            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 256 * 1024,
        }
    }
}

impl Config {
    /// Build a configuration from the process environment.
    ///
    /// Every variable is optional; unset values keep the defaults. Invalid
    /// numeric or address values are ignored with a warning rather than
    /// aborting startup, since every credential here already has a
    /// caller-supplied override path.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        config.bing_api_key = non_empty(env::var("BING_API_KEY").ok());
        config.brave_api_key = non_empty(env::var("BRAVE_API_KEY").ok());
        config.google_cx = non_empty(env::var("GOOGLE_CSE_CX").ok());
        config.mexc_api_key = non_empty(env::var("MEXC_API_KEY").ok());
        config.reddit_client_id = non_empty(env::var("REDDIT_CLIENT_ID").ok());
        config.reddit_client_secret = non_empty(env::var("REDDIT_CLIENT_SECRET").ok());

        if let Ok(val) = env::var("GOOGLE_API_KEYS") {
            config.google_keys = KeyRing::from_delimited(&val);
        } else if let Some(key) = non_empty(env::var("GOOGLE_API_KEY").ok()) {
            config.google_keys = KeyRing::new(vec![key]);
        }

        if let Ok(val) = env::var("BING_ENDPOINT") {
            config.bing_endpoint = val;
        }
        if let Ok(val) = env::var("BRAVE_ENDPOINT") {
            config.brave_endpoint = val;
        }
        if let Ok(val) = env::var("GOOGLE_ENDPOINT") {
            config.google_endpoint = val;
        }
        if let Ok(val) = env::var("MEXC_ENDPOINT") {
            config.mexc_endpoint = val;
        }
        if let Ok(val) = env::var("NICEHASH_ENDPOINT") {
            config.nicehash_endpoint = val;
        }
        if let Ok(val) = env::var("REDDIT_OAUTH_ENDPOINT") {
            config.reddit_oauth_endpoint = val;
        }
        if let Ok(val) = env::var("REDDIT_API_HOST") {
            config.reddit_api_host = val;
        }
        if let Ok(val) = env::var("REDDIT_PUBLIC_HOST") {
            config.reddit_public_host = val;
        }

        if let Ok(val) = env::var("LISTEN_ADDR") {
            match val.parse() {
                Ok(addr) => config.listen_addr = addr,
                Err(_) => log::warn!("Ignoring invalid LISTEN_ADDR: {}", val),
            }
        }

        if let Ok(val) = env::var("REQUEST_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => log::warn!("Ignoring invalid REQUEST_TIMEOUT_SECS: {}", val),
            }
        }

        config
    }
}

/// Application state shared across handlers
#[derive(Clone)]
#[derive(Debug)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Shared outbound HTTP client
    pub client: reqwest::Client,
}

impl AppState {
    /// Create a new application state with default configuration
    pub fn new() -> Result<Arc<Self>> {
        Self::with_config(Config::default())
    }

    /// Create a new application state with custom configuration
    pub fn with_config(config: Config) -> Result<Arc<Self>> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Arc::new(Self { config, client }))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn from_env_reads_credentials_and_falls_back_to_defaults() {
        env::set_var("BING_API_KEY", "bing-key");
        env::set_var("GOOGLE_API_KEYS", "k1, k2,k3");
        env::remove_var("BRAVE_API_KEY");

        let config = Config::from_env();
        assert_eq!(config.bing_api_key.as_deref(), Some("bing-key"));
        assert_eq!(config.brave_api_key, None);
        assert_eq!(config.google_keys.len(), 3);
        assert_eq!(config.google_keys.select(1), Some("k2"));
        assert!(config.mexc_endpoint.starts_with("https://api.mexc.com"));

        env::remove_var("BING_API_KEY");
        env::remove_var("GOOGLE_API_KEYS");
    }

    #[test]
    #[serial]
    fn blank_credential_is_treated_as_unset() {
        env::set_var("BRAVE_API_KEY", "   ");
        let config = Config::from_env();
        assert_eq!(config.brave_api_key, None);
        env::remove_var("BRAVE_API_KEY");
    }

    #[test]
    #[serial]
    fn invalid_listen_addr_keeps_default() {
        env::set_var("LISTEN_ADDR", "not-an-addr");
        let config = Config::from_env();
        assert_eq!(config.listen_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        env::remove_var("LISTEN_ADDR");
    }
}
