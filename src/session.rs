//! Chat session controller
//!
//! Implements the Elm Architecture pattern: a pure transition function over
//! session state, with effects executed by the controller.

mod controller;
mod effect;
pub mod event;
mod registry;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use controller::{ChatSession, SubmitRejected};
pub use effect::Effect;
pub use event::Event;
pub use registry::SessionRegistry;
pub use state::{SessionSnapshot, SUGGESTED_QUESTIONS};
