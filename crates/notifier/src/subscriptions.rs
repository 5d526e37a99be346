// In crates/notifier/src/subscriptions.rs

use std::sync::Arc;
use tokio::sync::RwLock;
use web_push::SubscriptionInfo;

/// Browser push subscriptions registered since startup.
///
/// Append-only and in-memory: no de-duplication, lost on restart.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionStore {
    inner: Arc<RwLock<Vec<SubscriptionInfo>>>,
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, subscription: SubscriptionInfo) {
        self.inner.write().await.push(subscription);
    }

    /// Copies the current list so sends do not hold the lock.
    pub async fn all(&self) -> Vec<SubscriptionInfo> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
