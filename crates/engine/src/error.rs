// In crates/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Ticker fetch failed, cycle aborted: {0}")]
    TickerFetch(#[source] api_client::Error),

    #[error("Invalid poller settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
