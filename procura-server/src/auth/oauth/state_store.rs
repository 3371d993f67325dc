//! In-memory OAuth state tokens
//!
//! Every authorization redirect mints a random `state` token bound to a
//! provider and a flow (login or link). The token is single-use and expires
//! after 10 minutes; expired entries are purged lazily on access.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use shared::models::{OAuthFlow, Provider};

use crate::util::generate_token;

const STATE_TTL: Duration = Duration::from_secs(600);

/// What a state token was minted for.
#[derive(Debug, Clone)]
pub struct StateRecord {
    pub provider: Provider,
    pub flow: OAuthFlow,
    /// Set for link flows: the already-authenticated user being linked
    pub user_id: Option<i64>,
    created_at: Instant,
}

#[derive(Clone)]
pub struct StateStore {
    inner: Arc<Mutex<HashMap<String, StateRecord>>>,
    ttl: Duration,
}

impl StateStore {
    pub fn new() -> Self {
        Self::with_ttl(STATE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Mint a state token for a provider/flow pair.
    pub async fn issue(&self, provider: Provider, flow: OAuthFlow, user_id: Option<i64>) -> String {
        let token = generate_token();
        let mut map = self.inner.lock().await;
        let now = Instant::now();
        map.retain(|_, rec| now.duration_since(rec.created_at) < self.ttl);
        map.insert(
            token.clone(),
            StateRecord {
                provider,
                flow,
                user_id,
                created_at: now,
            },
        );
        token
    }

    /// Consume a state token. The entry is removed unconditionally; `Some`
    /// is returned only when it existed, had not expired, and was minted for
    /// the same provider. The caller branches on the record's flow.
    pub async fn consume(&self, provider: Provider, token: &str) -> Option<StateRecord> {
        let mut map = self.inner.lock().await;
        let now = Instant::now();
        map.retain(|_, rec| now.duration_since(rec.created_at) < self.ttl);
        let rec = map.remove(token)?;
        if rec.provider == provider {
            Some(rec)
        } else {
            None
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_and_consume() {
        let store = StateStore::new();
        let token = store.issue(Provider::Google, OAuthFlow::Login, None).await;
        let rec = store.consume(Provider::Google, &token).await.unwrap();
        assert_eq!(rec.provider, Provider::Google);
        assert_eq!(rec.flow, OAuthFlow::Login);
        assert_eq!(rec.user_id, None);
    }

    #[tokio::test]
    async fn test_single_use() {
        let store = StateStore::new();
        let token = store
            .issue(Provider::Facebook, OAuthFlow::Login, None)
            .await;
        assert!(store.consume(Provider::Facebook, &token).await.is_some());
        assert!(store.consume(Provider::Facebook, &token).await.is_none());
    }

    #[tokio::test]
    async fn test_provider_mismatch_burns_token() {
        let store = StateStore::new();
        let token = store.issue(Provider::Google, OAuthFlow::Login, None).await;
        // Wrong provider: rejected, and the token is gone afterwards.
        assert!(store.consume(Provider::Facebook, &token).await.is_none());
        assert!(store.consume(Provider::Google, &token).await.is_none());
    }

    #[tokio::test]
    async fn test_link_flow_carries_user() {
        let store = StateStore::new();
        let token = store.issue(Provider::Wechat, OAuthFlow::Link, Some(31)).await;
        let rec = store.consume(Provider::Wechat, &token).await.unwrap();
        assert_eq!(rec.flow, OAuthFlow::Link);
        assert_eq!(rec.user_id, Some(31));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        // Zero TTL: every token is already expired when consumed.
        let store = StateStore::with_ttl(Duration::ZERO);
        let token = store.issue(Provider::Google, OAuthFlow::Login, None).await;
        assert!(store.consume(Provider::Google, &token).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let store = StateStore::new();
        assert!(store.consume(Provider::Google, "deadbeef").await.is_none());
    }
}
