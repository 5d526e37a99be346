// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid symbol '{0}': expected BASE/QUOTE")]
    InvalidSymbol(String),

    #[error("Unsupported timeframe '{0}'")]
    InvalidTimeframe(String),
}

pub type Result<T> = std::result::Result<T, Error>;
