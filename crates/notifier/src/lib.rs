// In crates/notifier/src/lib.rs

use async_trait::async_trait;
use core_types::{Symbol, Timeframe};

pub mod email;
pub mod error;
pub mod messages;
pub mod push;
pub mod subscriptions;
pub mod types;

// Re-export public types
pub use email::MailSender;
pub use error::{Error, Result};
pub use push::PushSender;
pub use subscriptions::SubscriptionStore;
pub use web_push::SubscriptionInfo;

/// The universal interface for alert delivery.
///
/// Both calls are fire-and-forget: implementations log their own delivery
/// failures and must return without waiting on the network, so a slow or
/// failing channel never stalls the poll loop.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a push notification to every registered subscription.
    async fn notify_push(&self, symbol: &Symbol, current_k: f64, timeframe: Timeframe);

    /// Sends the alert mail. `price` is `None` when no ticker was available.
    async fn notify_email(&self, symbol: &Symbol, current_k: f64, price: Option<f64>, timeframe: Timeframe);
}

/// The production notifier. Either channel may be disabled.
#[derive(Clone, Default)]
pub struct Dispatcher {
    push: Option<PushSender>,
    mail: Option<MailSender>,
}

impl Dispatcher {
    pub fn new(push: Option<PushSender>, mail: Option<MailSender>) -> Self {
        Self { push, mail }
    }

    pub fn push_enabled(&self) -> bool {
        self.push.is_some()
    }

    pub fn mail_enabled(&self) -> bool {
        self.mail.is_some()
    }
}

#[async_trait]
impl Notifier for Dispatcher {
    async fn notify_push(&self, symbol: &Symbol, current_k: f64, timeframe: Timeframe) {
        match &self.push {
            Some(push) => push.notify(symbol, current_k, timeframe).await,
            None => tracing::debug!(symbol = %symbol, "Push channel disabled; skipping."),
        }
    }

    async fn notify_email(&self, symbol: &Symbol, current_k: f64, price: Option<f64>, timeframe: Timeframe) {
        match &self.mail {
            Some(mail) => mail.notify(symbol, current_k, price, timeframe),
            None => tracing::debug!(symbol = %symbol, "Mail channel disabled; skipping."),
        }
    }
}
