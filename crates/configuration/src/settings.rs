use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub polling: PollingSettings,
}

/// Connection parameters for the platform backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the backend, without a trailing slash (e.g. "https://api.quantdesk.io/api").
    pub base_url: String,
    /// Per-request timeout applied to every HTTP call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where the client persists its credential pair between runs.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Path of the JSON file holding the access/refresh token pair.
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

/// Fixed intervals for the client's polling loops. No backoff or jitter is
/// applied; the loops re-invoke at exactly this cadence.
#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    /// Seconds between status fetches while watching a running backtest.
    #[serde(default = "default_backtest_interval_secs")]
    pub backtest_interval_secs: u64,
    /// Seconds between price fetches in live-price watch mode.
    #[serde(default = "default_price_interval_secs")]
    pub price_interval_secs: u64,
}

// --- Default Implementations ---
// These allow a user to omit the `[auth]` and `[polling]` sections from
// their toml and still have it work with sensible defaults.

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            backtest_interval_secs: default_backtest_interval_secs(),
            price_interval_secs: default_price_interval_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_file() -> PathBuf {
    PathBuf::from(".quantdesk/tokens.json")
}

fn default_backtest_interval_secs() -> u64 {
    2
}

fn default_price_interval_secs() -> u64 {
    5
}
