//! Client configuration.
//!
//! Everything the client needs besides credentials: where to send requests,
//! the endpoint path table, the quote asset appended to symbols, and how long
//! to wait for a freshly placed order to show up as a position.
//!
//! A configuration can be built in code or loaded from JSON:
//!
//! ```rust
//! use bitunix_api_client::config::ClientConfig;
//!
//! let config = ClientConfig::from_json_str(r#"{
//!     "baseUrl": "https://fapi.bitunix.com",
//!     "settlement": { "initialDelay": 2000, "pollInterval": 500, "maxAttempts": 8 }
//! }"#).unwrap();
//! assert_eq!(config.quote_asset, "USDT");
//! assert_eq!(config.settlement.max_attempts, 8);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use url::Url;

use crate::error::BitunixError;
use crate::rest::endpoints::{
    BITUNIX_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_QUOTE_ASSET, private, public,
};

/// Full client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Endpoint path table
    pub endpoints: Endpoints,
    /// Quote asset appended to base symbols (`BTC` becomes `BTCUSDT`)
    pub quote_asset: String,
    /// Value of the `language` header
    pub language: String,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Position lookup after order placement
    pub settlement: SettlementPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BITUNIX_BASE_URL.to_string(),
            endpoints: Endpoints::default(),
            quote_asset: DEFAULT_QUOTE_ASSET.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            user_agent: None,
            settlement: SettlementPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, BitunixError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BitunixError::Config(format!("malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BitunixError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| BitunixError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Check the base URL and quote asset.
    pub fn validate(&self) -> Result<(), BitunixError> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BitunixError::Config(format!(
                "base URL must be http(s), got {}",
                self.base_url
            )));
        }
        crate::validate::validate_quote_asset(&self.quote_asset)?;
        Ok(())
    }
}

/// Endpoint path table.
///
/// Accepts the legacy `setLevrage`, `takeProfit` and `openStopLoss` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoints {
    pub get_account: String,
    pub get_positions: String,
    pub get_position_history: String,
    #[serde(alias = "setLevrage")]
    pub set_leverage: String,
    pub set_margin_mode: String,
    pub set_position_mode: String,
    pub place_order: String,
    pub take_profit: String,
    #[serde(alias = "openStopLoss")]
    pub stop_loss: String,
    pub tickers: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            get_account: private::ACCOUNT.to_string(),
            get_positions: private::PENDING_POSITIONS.to_string(),
            get_position_history: private::HISTORY_POSITIONS.to_string(),
            set_leverage: private::CHANGE_LEVERAGE.to_string(),
            set_margin_mode: private::CHANGE_MARGIN_MODE.to_string(),
            set_position_mode: private::CHANGE_POSITION_MODE.to_string(),
            place_order: private::PLACE_ORDER.to_string(),
            take_profit: private::TPSL_PLACE_ORDER.to_string(),
            stop_loss: private::TPSL_PLACE_ORDER.to_string(),
            tickers: public::TICKERS.to_string(),
        }
    }
}

/// How the order workflow waits for a placed order to become a position.
///
/// The first lookup happens after `initial_delay`; further lookups follow
/// every `poll_interval` until `max_attempts` lookups have been made.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettlementPolicy {
    /// Wait before the first lookup, in milliseconds when serialized
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub initial_delay: Duration,
    /// Wait between lookups, in milliseconds when serialized
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub poll_interval: Duration,
    /// Total number of lookups, at least one is always made
    pub max_attempts: u32,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            poll_interval: Duration::from_secs(1),
            max_attempts: 10,
        }
    }
}

impl SettlementPolicy {
    /// Poll without waiting, useful against mock servers.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            poll_interval: Duration::ZERO,
            max_attempts,
        }
    }

    /// Upper bound on the time spent waiting, excluding request latency.
    pub fn deadline(&self) -> Duration {
        let attempts = self.max_attempts.max(1);
        self.initial_delay
            .saturating_add(self.poll_interval.saturating_mul(attempts - 1))
    }
}
