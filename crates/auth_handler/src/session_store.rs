//! In-memory credential cache.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::Credential;

/// Session name the admin bearer credential is stored under.
pub const BEARER_SESSION: &str = "bearerAuth";

/// Credentials keyed by session name.
///
/// The lock is only held while reading or writing a slot, never across a
/// network call.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Credential>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Option<Credential> {
        self.sessions.read().await.get(name).cloned()
    }

    /// Stores `credential`, replacing whatever was stored under `name`.
    pub async fn put(&self, name: &str, credential: Credential) {
        self.sessions
            .write()
            .await
            .insert(name.to_string(), credential);
    }

    pub async fn remove(&self, name: &str) -> Option<Credential> {
        self.sessions.write().await.remove(name)
    }
}
