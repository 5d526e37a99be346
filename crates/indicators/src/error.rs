// In crates/indicators/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Insufficient data: need at least {required} closes, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid indicator period '{name}': must be greater than 0")]
    InvalidPeriod { name: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
