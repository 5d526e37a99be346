// In crates/notifier/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Push delivery failed: {0}")]
    Push(#[from] web_push::WebPushError),

    #[error("Mail delivery failed: {0}")]
    Mail(#[from] lettre::transport::smtp::Error),

    #[error("Failed to build mail message: {0}")]
    MailBuild(#[from] lettre::error::Error),

    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to serialize push payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
