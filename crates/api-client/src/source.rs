// In crates/api-client/src/source.rs

use crate::Result;
use async_trait::async_trait;
use core_types::{Kline, Symbol, Ticker, Timeframe};
use std::collections::HashMap;

/// The exchange data the poll loop depends on.
///
/// Both calls are fallible: a ticker failure aborts a poll cycle, a candle
/// failure only skips that symbol/timeframe.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches 24h tickers for the given symbols.
    ///
    /// Symbols the exchange did not report are absent from the map.
    async fn fetch_tickers(&self, symbols: &[Symbol]) -> Result<HashMap<Symbol, Ticker>>;

    /// Fetches up to `limit` most recent candles, oldest first.
    async fn fetch_ohlcv(&self, symbol: &Symbol, timeframe: Timeframe, limit: u16) -> Result<Vec<Kline>>;
}
