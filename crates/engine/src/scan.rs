// In crates/engine/src/scan.rs

use alerts::{AlertSettings, derive_timeframe_state};
use api_client::MarketDataSource;
use chrono::Utc;
use core_types::{OscillatorPoint, Symbol, Timeframe, TimeframeState};
use indicators::{StochRsiSettings, latest_pair, stoch_rsi};

/// Output of a one-off oscillator scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub candles: usize,
    pub points: Vec<OscillatorPoint>,
    /// `None` when fewer than two points could be computed.
    pub state: Option<TimeframeState>,
}

/// Fetches candles for one pair and computes its oscillator without touching
/// any shared state or sending alerts.
pub async fn scan_symbol(
    source: &dyn MarketDataSource,
    symbol: &Symbol,
    timeframe: Timeframe,
    limit: u16,
    oscillator: &StochRsiSettings,
    alerts: &AlertSettings,
) -> anyhow::Result<ScanResult> {
    let klines = source.fetch_ohlcv(symbol, timeframe, limit).await?;
    let closes: Vec<f64> = klines.iter().map(|k| k.close).collect();
    let points = stoch_rsi(&closes, oscillator)?;
    let now = Utc::now();
    let state = latest_pair(&points).map(|(previous, current)| derive_timeframe_state(previous, current, alerts, now));

    Ok(ScanResult {
        candles: closes.len(),
        points,
        state,
    })
}
