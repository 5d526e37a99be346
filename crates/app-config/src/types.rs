// In crates/app-config/src/types.rs

use serde::Deserialize;

use alerts::AlertSettings;
use core_types::{Symbol, Timeframe};
use indicators::StochRsiSettings;
use notifier::types::NotificationSettings;

use crate::{Error, Result};

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub server: ServerSettings,
    /// Settings for the exchange REST API.
    #[serde(default)]
    pub exchange: ExchangeSettings,
    pub market: MarketSettings,
    #[serde(default)]
    pub oscillator: StochRsiSettings,
    #[serde(default)]
    pub alerts: AlertSettings,
    // Both channels are optional; a missing block disables that channel.
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl Settings {
    /// Checks everything the poll loop relies on before it starts.
    pub fn validate(&self) -> Result<()> {
        let symbols = self.market.symbols()?;
        if symbols.is_empty() {
            return Err(Error::Invalid("market.symbols must not be empty".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol) {
                return Err(Error::Invalid(format!("duplicate symbol '{}'", symbol)));
            }
        }
        if self.market.timeframes.is_empty() {
            return Err(Error::Invalid("market.timeframes must not be empty".into()));
        }
        if self.market.poll_interval_secs == 0 {
            return Err(Error::Invalid("market.poll_interval_secs must be greater than 0".into()));
        }

        self.oscillator
            .validate()
            .map_err(|e| Error::Invalid(e.to_string()))?;
        self.alerts
            .validate()
            .map_err(|e| Error::Invalid(e.to_string()))?;

        if let Some(push) = &self.notifications.push {
            let keys = [
                ("vapid_public_key", &push.vapid_public_key),
                ("vapid_private_key", &push.vapid_private_key),
                ("subject", &push.subject),
            ];
            if let Some((name, _)) = keys.iter().find(|(_, v)| v.trim().is_empty()) {
                return Err(Error::Invalid(format!("notifications.push.{} must not be empty", name)));
            }
        }
        if let Some(email) = &self.notifications.email {
            let fields = [
                ("smtp_host", &email.smtp_host),
                ("from", &email.from),
                ("to", &email.to),
            ];
            if let Some((name, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
                return Err(Error::Invalid(format!("notifications.email.{} must not be empty", name)));
            }
        }

        // Two oscillator points are needed to derive a trend.
        let needed = self.oscillator.warm_up() + 2;
        let limit = usize::from(self.exchange.candle_limit);
        if limit < needed || limit > 1000 {
            return Err(Error::Invalid(format!(
                "exchange.candle_limit must be between {} and 1000, got {}",
                needed, limit
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served as static assets (service worker, icons).
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Auto-refresh interval of the dashboard page.
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            refresh_seconds: default_refresh_seconds(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExchangeSettings {
    /// The REST API base URL.
    #[serde(default = "default_rest_base_url")]
    pub rest_base_url: String,
    /// Base of the per-pair trade page linked from the dashboard.
    #[serde(default = "default_trade_url_base")]
    pub trade_url_base: String,
    /// Currency label shown next to prices.
    #[serde(default = "default_quote_label")]
    pub quote_label: String,
    /// Fixed pause before every candle request.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_candle_limit")]
    pub candle_limit: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            rest_base_url: default_rest_base_url(),
            trade_url_base: default_trade_url_base(),
            quote_label: default_quote_label(),
            request_delay_ms: default_request_delay_ms(),
            candle_limit: default_candle_limit(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarketSettings {
    /// Pairs in `BASE/QUOTE` form, e.g. `["BTC/TRY", "ETH/TRY"]`.
    pub symbols: Vec<String>,
    #[serde(default = "default_timeframes")]
    pub timeframes: Vec<Timeframe>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl MarketSettings {
    /// Parses the configured symbols, skipping blank entries left by a
    /// trailing comma in the environment list.
    pub fn symbols(&self) -> Result<Vec<Symbol>> {
        self.symbols
            .iter()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| Symbol::parse(raw).map_err(|e| Error::Invalid(e.to_string())))
            .collect()
    }
}

/// Helper functions for serde defaults
fn default_environment() -> String { "development".into() }
fn default_log_level() -> String { "info".into() }
fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 3000 }
fn default_static_dir() -> String { "public".into() }
fn default_refresh_seconds() -> u32 { 30 }
fn default_rest_base_url() -> String { "https://api.binance.com".into() }
fn default_trade_url_base() -> String { "https://www.trbinance.com/trade".into() }
fn default_quote_label() -> String { "TRY".into() }
fn default_request_delay_ms() -> u64 { 500 }
fn default_candle_limit() -> u16 { 100 }
fn default_request_timeout_secs() -> u64 { 10 }
fn default_timeframes() -> Vec<Timeframe> { vec![Timeframe::H1] }
fn default_poll_interval_secs() -> u64 { 120 }
