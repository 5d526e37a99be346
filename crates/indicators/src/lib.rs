// In crates/indicators/src/lib.rs

pub mod error;
pub mod rsi;
pub mod stoch_rsi;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use stoch_rsi::{latest_pair, stoch_rsi};
pub use types::StochRsiSettings;
