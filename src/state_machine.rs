//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, Reply};
pub use state::{ConversationState, ExportedMessage, Message, Role, Stage};
#[allow(unused_imports)] // Public API re-exports
pub use transition::{accepts, greeting, transition, Input, TransitionError, TransitionResult};
