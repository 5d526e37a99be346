// In crates/notifier/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NotificationSettings {
    pub email: Option<EmailSettings>,
    pub push: Option<PushSettings>,
}

/// SMTP delivery over implicit TLS.
#[derive(Deserialize, Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

/// VAPID credentials for Web Push. Keys are URL-safe base64.
#[derive(Deserialize, Debug, Clone)]
pub struct PushSettings {
    pub vapid_public_key: String,
    pub vapid_private_key: String,
    /// Contact claim, e.g. "mailto:ops@example.com".
    pub subject: String,
}

/// The JSON body the service worker turns into a system notification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
}

fn default_smtp_port() -> u16 { 465 }
