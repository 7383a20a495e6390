//! Events that can occur in a chat session

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    InputChanged { text: String },
    Submit { text: String },

    // Generator events
    ReplyReady { text: String },
}
