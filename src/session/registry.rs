//! Registry of live chat sessions
//!
//! Each page that opens the chat widget gets its own session. Nothing is
//! persisted; sessions idle past the TTL are dropped by a background sweep.

use super::ChatSession;
use crate::assistant::ResponseGenerator;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Manager for all chat sessions
pub struct SessionRegistry {
    generator: Arc<ResponseGenerator>,
    sessions: RwLock<HashMap<String, Arc<ChatSession>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(generator: Arc<ResponseGenerator>, ttl: Duration) -> Self {
        Self {
            generator,
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a session for a newly opened chat surface
    pub async fn create(&self) -> Arc<ChatSession> {
        let id = uuid::Uuid::new_v4().to_string();
        let session = ChatSession::new(id.clone(), self.generator.clone());
        self.sessions.write().await.insert(id.clone(), session.clone());
        tracing::info!(session = %id, model = %self.generator.model_id(), "Chat session created");
        session
    }

    pub async fn get(&self, id: &str) -> Option<Arc<ChatSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than the TTL. Busy sessions are kept
    /// until their reply lands. Returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let candidates: Vec<Arc<ChatSession>> = sessions.values().cloned().collect();

        let mut removed = 0;
        for session in candidates {
            let id = session.id();
            if session
                .evict_if_expired(self.ttl, || {
                    sessions.remove(id);
                })
                .await
            {
                tracing::info!(session = %id, "Chat session expired");
                removed += 1;
            }
        }
        removed
    }

    /// Run [`Self::sweep_expired`] every `interval` until the task is aborted
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = registry.sweep_expired().await;
                if removed > 0 {
                    let remaining = registry.len().await;
                    tracing::debug!(removed, remaining, "Session sweep");
                }
            }
        })
    }
}
