//! HTTP API for the chat widget
//!
//! The presentation boundary: the widget creates a session when it opens,
//! pushes input and submits, and renders snapshots from the SSE stream.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::session::SessionRegistry;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionRegistry>) -> Self {
        Self { sessions }
    }
}
