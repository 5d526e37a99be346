// In crates/core-types/src/snapshot.rs

use crate::types::{Symbol, SymbolState, Ticker, Timeframe, TimeframeState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The handle shared between the poller (sole writer) and the web server (reader).
pub type SharedSnapshot = Arc<RwLock<MarketSnapshot>>;

/// The latest known market state, keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketSnapshot {
    symbols: HashMap<Symbol, SymbolState>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an empty snapshot in the shared handle.
    pub fn shared() -> SharedSnapshot {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&SymbolState> {
        self.symbols.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Replaces the price, change and update time of a symbol.
    ///
    /// Timeframe states already recorded for the symbol are kept; they are
    /// merged individually through [`MarketSnapshot::merge_timeframe`].
    pub fn record_ticker(&mut self, symbol: &Symbol, ticker: Option<&Ticker>, now: DateTime<Utc>) {
        let fresh = SymbolState::new(ticker, now);
        match self.symbols.get_mut(symbol) {
            Some(existing) => {
                existing.price = fresh.price;
                existing.percent_change = fresh.percent_change;
                existing.last_update = fresh.last_update;
            }
            None => {
                self.symbols.insert(symbol.clone(), fresh);
            }
        }
    }

    /// Stores the state for one timeframe, overwriting any previous value.
    ///
    /// Has no effect for symbols that never had a ticker recorded.
    pub fn merge_timeframe(&mut self, symbol: &Symbol, timeframe: Timeframe, state: TimeframeState) {
        if let Some(existing) = self.symbols.get_mut(symbol) {
            existing.timeframes.insert(timeframe, state);
        }
    }
}
