// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A trading pair in `BASE/QUOTE` form (e.g., "BTC/TRY").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    /// Parses and validates a `BASE/QUOTE` pair, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = Symbol(raw.trim().to_uppercase());
        symbol.split_pair()?;
        Ok(symbol)
    }

    /// Splits the symbol into its base and quote assets.
    pub fn split_pair(&self) -> Result<(&str, &str)> {
        match self.0.split_once('/') {
            Some((base, quote))
                if !base.is_empty()
                    && !quote.is_empty()
                    && !quote.contains('/')
                    && base.chars().chain(quote.chars()).all(|c| c.is_ascii_alphanumeric()) =>
            {
                Ok((base, quote))
            }
            _ => Err(Error::InvalidSymbol(self.0.clone())),
        }
    }

    /// The code the exchange REST API expects, e.g. "BTCTRY".
    pub fn exchange_code(&self) -> String {
        self.0.replace('/', "")
    }

    /// The code used in trade page links, e.g. "BTC_TRY".
    pub fn trade_code(&self) -> String {
        self.0.replace('/', "_")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candle intervals supported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    M1,
    M3,
    M5,
    M15,
    M30,
    H1,
    H2,
    H4,
    H6,
    H8,
    H12,
    D1,
    D3,
    W1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M3 => "3m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H2 => "2h",
            Timeframe::H4 => "4h",
            Timeframe::H6 => "6h",
            Timeframe::H8 => "8h",
            Timeframe::H12 => "12h",
            Timeframe::D1 => "1d",
            Timeframe::D3 => "3d",
            Timeframe::W1 => "1w",
        }
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tf = match s.trim() {
            "1m" => Timeframe::M1,
            "3m" => Timeframe::M3,
            "5m" => Timeframe::M5,
            "15m" => Timeframe::M15,
            "30m" => Timeframe::M30,
            "1h" => Timeframe::H1,
            "2h" => Timeframe::H2,
            "4h" => Timeframe::H4,
            "6h" => Timeframe::H6,
            "8h" => Timeframe::H8,
            "12h" => Timeframe::H12,
            "1d" => Timeframe::D1,
            "3d" => Timeframe::D3,
            "1w" => Timeframe::W1,
            other => return Err(Error::InvalidTimeframe(other.to_string())),
        };
        Ok(tf)
    }
}

impl TryFrom<String> for Timeframe {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.as_str().to_string()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single OHLCV candle. Times are exchange milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

/// The 24h ticker fields the dashboard needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Last traded price.
    pub last: f64,
    /// 24h change in percent.
    pub percentage: f64,
}

/// One smoothed Stochastic RSI reading. Both lines are in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorPoint {
    pub k: f64,
    pub d: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Up => "↗",
            TrendDirection::Down => "↘",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OscillatorStatus {
    Oversold,
    Overbought,
    Normal,
}

impl OscillatorStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OscillatorStatus::Oversold => "⚠️ OVERSOLD",
            OscillatorStatus::Overbought => "🚀 OVERBOUGHT",
            OscillatorStatus::Normal => "Normal",
        }
    }
}

/// Display state for one symbol on one timeframe, derived from the two
/// most recent oscillator points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeframeState {
    pub current_k: f64,
    pub current_d: f64,
    pub trend: TrendDirection,
    pub status: OscillatorStatus,
    /// When these candles were computed. Older than the symbol's
    /// `last_update` when a later candle fetch failed.
    pub updated_at: DateTime<Utc>,
}

/// Everything the dashboard knows about one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolState {
    /// Last price, `None` when the ticker did not include the symbol ("N/A").
    pub price: Option<f64>,
    pub percent_change: f64,
    /// Time of the last ticker refresh.
    pub last_update: DateTime<Utc>,
    pub timeframes: BTreeMap<Timeframe, TimeframeState>,
}

impl SymbolState {
    pub fn new(ticker: Option<&Ticker>, now: DateTime<Utc>) -> Self {
        Self {
            price: ticker.map(|t| t.last),
            percent_change: ticker.map(|t| t.percentage).unwrap_or(0.0),
            last_update: now,
            timeframes: BTreeMap::new(),
        }
    }
}
