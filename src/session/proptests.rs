//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences:
//! - The transcript only ever grows by appending
//! - Whitespace-only submits never change the transcript or request a reply
//! - Each accepted submit requests exactly one reply
//! - A busy session never accepts another submit

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ?$.]{1,40}",
        Just(String::new()),
        "[ \t\n]{1,5}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::InputChanged { text }),
        arb_text().prop_map(|text| Event::Submit { text }),
        arb_text().prop_map(|text| Event::ReplyReady { text }),
    ]
}

/// Apply events, skipping rejected ones, and return every intermediate state
fn run(events: Vec<Event>) -> Vec<(SessionState, Event, Result<TransitionResult, TransitionError>)> {
    let mut state = SessionState::new();
    let mut trace = Vec::new();
    for event in events {
        let result = transition(&state, event.clone());
        let before = state.clone();
        if let Ok(r) = &result {
            state = r.new_state.clone();
        }
        trace.push((before, event, result));
    }
    trace
}

/// State after applying every accepted event
fn final_state(events: Vec<Event>) -> SessionState {
    let mut state = SessionState::new();
    for event in events {
        if let Ok(r) = transition(&state, event) {
            state = r.new_state;
        }
    }
    state
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn transcript_is_append_only(events in proptest::collection::vec(arb_event(), 0..40)) {
        for (before, _, result) in run(events) {
            if let Ok(r) = result {
                let after = r.new_state.transcript();
                prop_assert!(after.len() >= before.transcript().len());
                prop_assert_eq!(&after[..before.transcript().len()], before.transcript());
                prop_assert!(after.len() - before.transcript().len() <= 1);
            }
        }
    }

    #[test]
    fn blank_submit_is_a_no_op(events in proptest::collection::vec(arb_event(), 0..20), blank in "[ \t\n]{0,5}") {
        let state = final_state(events);
        let result = transition(&state, Event::Submit { text: blank });
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyMessage);
    }

    #[test]
    fn accepted_submit_requests_one_reply(events in proptest::collection::vec(arb_event(), 0..40)) {
        for (before, event, result) in run(events) {
            let Ok(r) = result else { continue };
            let requests = r
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::RequestReply { .. }))
                .count();
            match event {
                Event::Submit { text } => {
                    prop_assert!(!before.is_busy());
                    prop_assert_eq!(requests, 1);
                    prop_assert!(r.new_state.is_busy());
                    prop_assert_eq!(r.new_state.transcript().last(), Some(&Message::user(text)));
                }
                _ => {
                    prop_assert_eq!(requests, 0);
                }
            }
        }
    }

    #[test]
    fn busy_rejects_submit(events in proptest::collection::vec(arb_event(), 0..40)) {
        for (before, event, result) in run(events) {
            if before.is_busy() {
                if let Event::Submit { text } = event {
                    let expected = if text.trim().is_empty() {
                        TransitionError::EmptyMessage
                    } else {
                        TransitionError::Busy
                    };
                    prop_assert_eq!(result.unwrap_err(), expected);
                }
            }
        }
    }

    #[test]
    fn replies_alternate_with_user_turns(events in proptest::collection::vec(arb_event(), 0..60)) {
        let state = final_state(events);

        // Greeting, then strictly user/assistant pairs (the last reply may be pending)
        let transcript = state.transcript();
        prop_assert_eq!(transcript[0].role(), Role::Assistant);
        for (i, message) in transcript.iter().enumerate().skip(1) {
            let expected = if i % 2 == 1 { Role::User } else { Role::Assistant };
            prop_assert_eq!(message.role(), expected);
        }
        prop_assert_eq!(state.is_busy(), transcript.len() % 2 == 0);
    }
}
