//! Effects produced by state transitions

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the response generator for a reply to `utterance`
    RequestReply { utterance: String },

    /// Push the new snapshot to subscribers
    NotifyObservers,
}

impl Effect {
    pub fn request_reply(utterance: impl Into<String>) -> Self {
        Effect::RequestReply {
            utterance: utterance.into(),
        }
    }
}
