//! Out-of-band mobile push seam and device token store

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PushError {
    /// The provider reports the token is dead; the stored token must be dropped
    #[error("device no longer registered")]
    DeviceNotRegistered,

    #[error("push delivery failed: {0}")]
    Delivery(String),
}

/// A push message for one device
#[derive(Debug, Clone)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

/// Provider seam for mobile push.
///
/// The concrete provider lives outside this crate; the server only needs
/// send semantics and the dead-token signal.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, device_token: &str, message: &PushMessage) -> Result<(), PushError>;
}

/// Push sender used when no provider is configured
#[derive(Debug, Clone, Default)]
pub struct LogOnlyPushSender;

#[async_trait]
impl PushSender for LogOnlyPushSender {
    async fn send(&self, device_token: &str, message: &PushMessage) -> Result<(), PushError> {
        tracing::debug!(
            "Push (log only) to {device_token}: {} / {}",
            message.title,
            message.body
        );
        Ok(())
    }
}

/// Device token store: customer id -> push token
#[derive(Clone, Default)]
pub struct TokenStore {
    tokens: Arc<DashMap<String, String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, customer_id: impl Into<String>, token: impl Into<String>) {
        self.tokens.insert(customer_id.into(), token.into());
    }

    pub fn get(&self, customer_id: &str) -> Option<String> {
        self.tokens.get(customer_id).map(|t| t.value().clone())
    }

    pub fn clear(&self, customer_id: &str) {
        self.tokens.remove(customer_id);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_store_register_get_clear() {
        let store = TokenStore::new();
        assert!(store.get("cust-1").is_none());

        store.register("cust-1", "token-abc");
        assert_eq!(store.get("cust-1").as_deref(), Some("token-abc"));

        // Re-registration replaces the token
        store.register("cust-1", "token-def");
        assert_eq!(store.get("cust-1").as_deref(), Some("token-def"));

        store.clear("cust-1");
        assert!(store.get("cust-1").is_none());
        assert!(store.is_empty());
    }
}
