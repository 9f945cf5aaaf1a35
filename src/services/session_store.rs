use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ended sessions, keyed by session id. An entry is kept until the longest-lived
/// token of that session would have expired anyway.
#[derive(Clone, Default)]
pub struct SessionStore {
    revoked: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, sid: &str, until: DateTime<Utc>) {
        let now = Utc::now();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, expires_at| *expires_at > now);
        revoked.insert(sid.to_string(), until);
    }

    pub async fn is_revoked(&self, sid: &str) -> bool {
        let revoked = self.revoked.read().await;
        revoked
            .get(sid)
            .is_some_and(|expires_at| *expires_at > Utc::now())
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }
}
