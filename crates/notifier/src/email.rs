// In crates/notifier/src/email.rs

use crate::messages::{email_body, email_subject};
use crate::types::EmailSettings;
use crate::Result;
use core_types::{Symbol, Timeframe};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

/// Sends plain-text alert mails through an SMTP relay (implicit TLS).
#[derive(Clone)]
pub struct MailSender {
    from: Mailbox,
    to: Mailbox,
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
}

impl MailSender {
    /// Validates the addresses and prepares the transport. No connection is
    /// opened until the first send.
    pub fn new(settings: &EmailSettings) -> Result<Self> {
        let from: Mailbox = settings.from.parse()?;
        let to: Mailbox = settings.to.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)?
            .port(settings.smtp_port)
            .credentials(Credentials::new(settings.username.clone(), settings.password.clone()))
            .build();

        Ok(Self {
            from,
            to,
            transport: Arc::new(transport),
        })
    }

    pub fn build_message(
        &self,
        symbol: &Symbol,
        current_k: f64,
        price: Option<f64>,
        timeframe: Timeframe,
    ) -> Result<Message> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(email_subject(symbol))
            .header(ContentType::TEXT_PLAIN)
            .body(email_body(symbol, current_k, price, timeframe))?;
        Ok(message)
    }

    /// Spawns the delivery and returns immediately.
    pub fn notify(&self, symbol: &Symbol, current_k: f64, price: Option<f64>, timeframe: Timeframe) {
        let message = match self.build_message(symbol, current_k, price, timeframe) {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(symbol = %symbol, error = %e, "Failed to build alert mail.");
                return;
            }
        };

        let transport = Arc::clone(&self.transport);
        let symbol = symbol.clone();
        tokio::spawn(async move {
            match transport.send(message).await {
                Ok(_) => tracing::info!(symbol = %symbol, "Alert mail sent."),
                Err(e) => tracing::error!(symbol = %symbol, error = %e, "Mail delivery failed."),
            }
        });
    }
}
