// In crates/alerts/src/lib.rs

pub mod error;
pub mod policy;
pub mod state;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use policy::{AlertKey, AlertPolicy, CooldownBook, should_alert};
pub use state::{classify, derive_timeframe_state, trend_direction};
pub use types::{AlertSettings, CooldownScope};
