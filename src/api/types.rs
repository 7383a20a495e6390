//! API request and response types

use crate::session::SessionSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to submit a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Query parameters for a submit
#[derive(Debug, Default, Deserialize)]
pub struct SubmitParams {
    /// Hold the response until the reply is in the transcript
    #[serde(default)]
    pub wait: bool,
}

/// Request to replace the input buffer
#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub text: String,
}

/// Response with a session and its current state
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub snapshot: SessionSnapshot,
}

/// Response for a submit
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// State after the reply, when the caller asked to wait
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SessionSnapshot>,
}

impl ChatResponse {
    pub fn accepted(snapshot: Option<SessionSnapshot>) -> Self {
        Self {
            accepted: true,
            reason: None,
            snapshot,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
            snapshot: None,
        }
    }
}

/// Response listing canned questions
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
