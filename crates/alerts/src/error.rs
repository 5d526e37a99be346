// In crates/alerts/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Invalid alert thresholds: oversold {oversold} must be below overbought {overbought}, both within 0..=100")]
    InvalidThresholds { oversold: f64, overbought: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
