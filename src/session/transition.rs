//! Pure state transition function
//!
//! Given the same state and event this always produces the same result and
//! performs no I/O. The controller applies the new state and runs the effects.

use super::state::{Message, Phase, SessionState};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Assistant is busy, wait for the current reply")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state.phase(), event) {
        // Typing is allowed at any time, including while a reply is pending
        (_, Event::InputChanged { text }) => {
            let mut next = state.clone();
            next.input = text;
            Ok(TransitionResult::new(next).with_effect(Effect::NotifyObservers))
        }

        (_, Event::Submit { text }) if text.trim().is_empty() => Err(TransitionError::EmptyMessage),

        // Idle + Submit -> AwaitingReply
        (Phase::Idle, Event::Submit { text }) => {
            let mut next = state.clone();
            next.transcript.push(Message::user(text.clone()));
            next.input.clear();
            next.phase = Phase::AwaitingReply;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::NotifyObservers)
                .with_effect(Effect::request_reply(text)))
        }

        // One reply at a time; a second submit would pair replies with the wrong turn
        (Phase::AwaitingReply, Event::Submit { .. }) => Err(TransitionError::Busy),

        // AwaitingReply + ReplyReady -> Idle
        (Phase::AwaitingReply, Event::ReplyReady { text }) => {
            let mut next = state.clone();
            next.transcript.push(Message::assistant(text));
            next.phase = Phase::Idle;
            Ok(TransitionResult::new(next).with_effect(Effect::NotifyObservers))
        }

        (Phase::Idle, event @ Event::ReplyReady { .. }) => Err(TransitionError::InvalidTransition(
            format!("No transition from {:?} with event {event:?}", Phase::Idle),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::{Role, GREETING};

    fn submit(text: &str) -> Event {
        Event::Submit {
            text: text.to_string(),
        }
    }

    fn reply(text: &str) -> Event {
        Event::ReplyReady {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_idle_submit_to_awaiting_reply() {
        let mut state = SessionState::new();
        state.input = "How much does it cost?".to_string();

        let result = transition(&state, submit("How much does it cost?")).unwrap();

        assert_eq!(result.new_state.phase(), Phase::AwaitingReply);
        assert!(result.new_state.input().is_empty());
        assert_eq!(
            result.new_state.transcript().last(),
            Some(&Message::user("How much does it cost?"))
        );
        assert_eq!(
            result.effects,
            vec![
                Effect::NotifyObservers,
                Effect::request_reply("How much does it cost?")
            ]
        );
    }

    #[test]
    fn test_submit_keeps_text_untrimmed() {
        let result = transition(&SessionState::new(), submit("  hi  ")).unwrap();
        assert_eq!(result.new_state.transcript()[1].text(), "  hi  ");
        assert_eq!(result.effects[1], Effect::request_reply("  hi  "));
    }

    #[test]
    fn test_reject_whitespace_submit() {
        for text in ["", "   ", "\n\t "] {
            let result = transition(&SessionState::new(), submit(text));
            assert_eq!(result.unwrap_err(), TransitionError::EmptyMessage);
        }
    }

    #[test]
    fn test_reject_submit_while_busy() {
        let busy = transition(&SessionState::new(), submit("first"))
            .unwrap()
            .new_state;

        let result = transition(&busy, submit("second"));
        assert_eq!(result.unwrap_err(), TransitionError::Busy);
    }

    #[test]
    fn test_reply_returns_to_idle() {
        let busy = transition(&SessionState::new(), submit("How much does it cost?"))
            .unwrap()
            .new_state;

        let result = transition(&busy, reply("Starter is $399/mo.")).unwrap();

        let transcript = result.new_state.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].text(), GREETING);
        assert_eq!(transcript[1], Message::user("How much does it cost?"));
        assert_eq!(transcript[2], Message::assistant("Starter is $399/mo."));
        assert_eq!(transcript[2].role(), Role::Assistant);
        assert_eq!(result.new_state.phase(), Phase::Idle);
        assert_eq!(result.effects, vec![Effect::NotifyObservers]);
    }

    #[test]
    fn test_reply_while_idle_is_invalid() {
        let result = transition(&SessionState::new(), reply("stray"));
        assert!(matches!(result, Err(TransitionError::InvalidTransition(_))));
    }

    #[test]
    fn test_input_changes_while_busy() {
        let busy = transition(&SessionState::new(), submit("first"))
            .unwrap()
            .new_state;

        let result = transition(
            &busy,
            Event::InputChanged {
                text: "next question".to_string(),
            },
        )
        .unwrap();

        assert_eq!(result.new_state.input(), "next question");
        assert!(result.new_state.is_busy());
        assert_eq!(result.new_state.transcript(), busy.transcript());
    }
}
