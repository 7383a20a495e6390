//! Chat session controller
//!
//! Owns one session's state, feeds events through [`transition`], and runs
//! the resulting effects. Observers get a fresh snapshot after every change.

use super::state::{SessionSnapshot, SessionState};
use super::transition::{transition, TransitionError};
use super::{Effect, Event};
use crate::assistant::ResponseGenerator;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Why a submit left the session untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,
    #[error("a reply is already pending")]
    Busy,
    #[error("session is in an unexpected state")]
    Unexpected,
}

struct Inner {
    state: SessionState,
    last_activity: Instant,
}

/// One visitor's chat session
pub struct ChatSession {
    id: String,
    created_at: DateTime<Utc>,
    inner: Mutex<Inner>,
    generator: Arc<ResponseGenerator>,
    updates: broadcast::Sender<SessionSnapshot>,
}

/// Handle to the reply task started by an accepted submit
pub struct PendingReply {
    handle: JoinHandle<()>,
}

impl PendingReply {
    /// Wait until the reply has been appended to the transcript
    pub async fn settled(self) {
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Reply task failed");
        }
    }
}

impl ChatSession {
    pub fn new(id: impl Into<String>, generator: Arc<ResponseGenerator>) -> Arc<Self> {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Arc::new(Self {
            id: id.into(),
            created_at: Utc::now(),
            inner: Mutex::new(Inner {
                state: SessionState::new(),
                last_activity: Instant::now(),
            }),
            generator,
            updates,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.state.snapshot()
    }

    #[cfg(test)]
    pub async fn is_busy(&self) -> bool {
        self.inner.lock().await.state.is_busy()
    }

    /// Run `evict` if the session is idle and has been for longer than `ttl`.
    /// The session lock is held across the check and `evict`, so a submit
    /// cannot slip in between.
    pub async fn evict_if_expired(&self, ttl: Duration, evict: impl FnOnce()) -> bool {
        let inner = self.inner.lock().await;
        if inner.state.is_busy() || inner.last_activity.elapsed() <= ttl {
            return false;
        }
        evict();
        true
    }

    /// Subscribe to snapshots published after each change
    pub fn subscribe(&self) -> broadcast::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Snapshot plus a receiver for everything after it, with nothing lost in between
    pub async fn snapshot_and_subscribe(&self) -> (SessionSnapshot, broadcast::Receiver<SessionSnapshot>) {
        let inner = self.inner.lock().await;
        (inner.state.snapshot(), self.subscribe())
    }

    /// Replace the in-progress input buffer
    pub async fn set_input_buffer(&self, text: impl Into<String>) {
        let event = Event::InputChanged { text: text.into() };
        // Input changes are accepted in every phase
        if let Err(e) = self.apply(event).await {
            tracing::error!(session = %self.id, error = %e, "Input change rejected");
        }
    }

    /// Submit a user message.
    ///
    /// Blank text and submits while a reply is pending are rejected without
    /// touching the transcript. Otherwise the user message is appended, the
    /// session goes busy, and a reply is requested in the background.
    pub async fn submit(self: &Arc<Self>, text: impl Into<String>) -> Result<PendingReply, SubmitRejected> {
        let effects = match self.apply(Event::Submit { text: text.into() }).await {
            Ok(effects) => effects,
            Err(TransitionError::EmptyMessage) => {
                tracing::debug!(session = %self.id, "Ignoring empty submit");
                return Err(SubmitRejected::Empty);
            }
            Err(TransitionError::Busy) => {
                tracing::debug!(session = %self.id, "Ignoring submit while busy");
                return Err(SubmitRejected::Busy);
            }
            Err(e @ TransitionError::InvalidTransition(_)) => {
                tracing::error!(session = %self.id, error = %e, "Unexpected submit transition");
                return Err(SubmitRejected::Unexpected);
            }
        };

        let mut pending = None;
        for effect in effects {
            if let Effect::RequestReply { utterance } = effect {
                pending = Some(self.spawn_reply(utterance));
            }
        }

        pending.ok_or_else(|| {
            tracing::error!(session = %self.id, "Accepted submit produced no reply request");
            SubmitRejected::Unexpected
        })
    }

    fn spawn_reply(self: &Arc<Self>, utterance: String) -> PendingReply {
        let session = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let text = session.generator.respond(&utterance).await;
            tracing::info!(session = %session.id, chars = text.len(), "Reply ready");

            if let Err(e) = session.apply(Event::ReplyReady { text }).await {
                tracing::error!(session = %session.id, error = %e, "Failed to record reply");
            }
        });
        PendingReply { handle }
    }

    /// Run one event through the state machine under the session lock.
    /// Observer notifications happen here so they are ordered like the
    /// mutations; other effects are returned to the caller.
    async fn apply(&self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let mut inner = self.inner.lock().await;
        let result = transition(&inner.state, event)?;
        inner.state = result.new_state;
        inner.last_activity = Instant::now();

        let mut remaining = Vec::new();
        for effect in result.effects {
            match effect {
                Effect::NotifyObservers => {
                    // No receivers is fine; nobody is watching this session
                    let _ = self.updates.send(inner.state.snapshot());
                }
                other => remaining.push(other),
            }
        }
        Ok(remaining)
    }
}
