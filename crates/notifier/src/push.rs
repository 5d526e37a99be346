// In crates/notifier/src/push.rs

use crate::messages::push_payload;
use crate::subscriptions::SubscriptionStore;
use crate::types::{PushPayload, PushSettings};
use crate::Result;
use core_types::{Symbol, Timeframe};
use std::sync::Arc;
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, URL_SAFE_NO_PAD, VapidSignatureBuilder,
    WebPushClient, WebPushMessage, WebPushMessageBuilder,
};

/// Fans a notification out to every registered browser subscription.
#[derive(Clone)]
pub struct PushSender {
    settings: Arc<PushSettings>,
    subscriptions: SubscriptionStore,
    client: Arc<HyperWebPushClient>,
}

impl PushSender {
    pub fn new(settings: PushSettings, subscriptions: SubscriptionStore) -> Self {
        Self {
            settings: Arc::new(settings),
            subscriptions,
            client: Arc::new(HyperWebPushClient::new()),
        }
    }

    /// Spawns one delivery task per subscription and returns immediately.
    pub async fn notify(&self, symbol: &Symbol, current_k: f64, timeframe: Timeframe) {
        let payload = push_payload(symbol, current_k, timeframe);
        let targets = self.subscriptions.all().await;
        tracing::debug!(symbol = %symbol, targets = targets.len(), "Dispatching push notification.");

        for subscription in targets {
            let sender = self.clone();
            let payload = payload.clone();
            tokio::spawn(async move {
                if let Err(e) = sender.send_one(&subscription, &payload).await {
                    tracing::error!(endpoint = %subscription.endpoint, error = %e, "Push delivery failed.");
                }
            });
        }
    }

    async fn send_one(&self, subscription: &SubscriptionInfo, payload: &PushPayload) -> Result<()> {
        let message = self.build_message(subscription, payload)?;
        self.client.send(message).await?;
        Ok(())
    }

    /// Encrypts the payload for one subscription and signs it with the
    /// VAPID private key (URL-safe base64, no padding).
    pub fn build_message(&self, subscription: &SubscriptionInfo, payload: &PushPayload) -> Result<WebPushMessage> {
        let content = serde_json::to_vec(payload)?;

        let mut signature =
            VapidSignatureBuilder::from_base64(&self.settings.vapid_private_key, URL_SAFE_NO_PAD, subscription)?;
        signature.add_claim("sub", self.settings.subject.as_str());

        let mut builder = WebPushMessageBuilder::new(subscription);
        builder.set_payload(ContentEncoding::Aes128Gcm, &content);
        builder.set_vapid_signature(signature.build()?);

        Ok(builder.build()?)
    }
}
