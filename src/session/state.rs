//! Chat session state types

use serde::{Deserialize, Serialize};

/// Assistant message every session starts with
pub const GREETING: &str = "Hello! I'm Summit. I can help you with pricing, feature details, or scheduling a demo. What would you like to know?";

/// Canned questions offered at the start of a conversation
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "How much does it cost?",
    "Tell me about Summit Voice AI",
    "Is it ONC Certified?",
    "Does it include RCM?",
];

/// Suggestions are hidden once the transcript reaches this many messages
pub const SUGGESTION_THRESHOLD: usize = 4;

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    #[cfg(test)]
    pub fn role(&self) -> Role {
        self.role
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Whether a reply is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Ready for user input
    #[default]
    Idle,
    /// A reply has been requested and not yet appended
    AwaitingReply,
}

/// Authoritative state of one chat session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub(super) transcript: Vec<Message>,
    pub(super) phase: Phase,
    pub(super) input: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Fresh state seeded with the greeting
    pub fn new() -> Self {
        Self {
            transcript: vec![Message::assistant(GREETING)],
            phase: Phase::Idle,
            input: String::new(),
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == Phase::AwaitingReply
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions_visible(&self) -> bool {
        !self.is_busy() && self.transcript.len() < SUGGESTION_THRESHOLD
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.transcript().to_vec(),
            busy: self.is_busy(),
            input: self.input().to_string(),
            suggestions: if self.suggestions_visible() {
                SUGGESTED_QUESTIONS.iter().map(ToString::to_string).collect()
            } else {
                Vec::new()
            },
        }
    }
}

/// What a UI renders after each change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub busy: bool,
    pub input: String,
    /// Empty while suggestions are hidden
    pub suggestions: Vec<String>,
}
