// In crates/core-types/src/lib.rs

pub mod error;
pub mod snapshot;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use snapshot::{MarketSnapshot, SharedSnapshot};
pub use types::{
    Kline, OscillatorPoint, OscillatorStatus, Symbol, SymbolState, Ticker, Timeframe,
    TimeframeState, TrendDirection,
};
