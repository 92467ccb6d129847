//! Pure state transition function
//!
//! Given the same state and event this always produces the same new state and
//! effects. Provider calls, clocks and storage live in the runtime.

use super::event::Reply;
use super::state::{ConversationState, Role, Stage};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConversationState) -> Self {
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
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Input must not be empty")]
    EmptyInput,
    #[error("Conversation is at stage {actual}, this input is only accepted at {expected}")]
    InvalidStage { expected: Stage, actual: Stage },
}

/// Kind of user input a stage solicits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Name,
    Feeling,
    Chat,
}

impl Input {
    /// The only stage at which this input is accepted
    pub fn stage(self) -> Stage {
        match self {
            Input::Name => Stage::AwaitingName,
            Input::Feeling => Stage::AwaitingFeeling,
            Input::Chat => Stage::FreeChat,
        }
    }
}

/// Bot greeting appended once the user has given their name
pub fn greeting(name: &str) -> String {
    format!("Halo, {name}! Salam kenal, aku Sedulurmu, siap mendengarkan.")
}

/// Check whether `state` would accept `input` carrying `text`.
///
/// The runtime calls this before reaching out to the response provider so a
/// rejected turn never costs a provider round trip.
pub fn accepts(state: &ConversationState, input: Input, text: &str) -> Result<(), TransitionError> {
    let expected = input.stage();
    if state.stage != expected {
        return Err(TransitionError::InvalidStage {
            expected,
            actual: state.stage,
        });
    }
    if text.trim().is_empty() {
        return Err(TransitionError::EmptyInput);
    }
    Ok(())
}

/// Pure transition function
pub fn transition(
    state: &ConversationState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // AwaitingName + NameSubmitted -> AwaitingFeeling
        Event::NameSubmitted { name, at } => {
            accepts(state, Input::Name, &name)?;
            let name = name.trim().to_string();

            let mut next = state.clone();
            next.push(Role::Bot, greeting(&name), at);
            next.user_name = Some(name);
            next.stage = Stage::AwaitingFeeling;

            Ok(TransitionResult::new(next).with_effect(Effect::PersistLog))
        }

        // AwaitingFeeling + FeelingShared -> FreeChat
        Event::FeelingShared { text, reply, at } => {
            accepts(state, Input::Feeling, &text)?;
            let next = exchange(state, text, reply, at);
            Ok(TransitionResult::new(next).with_effect(Effect::PersistLog))
        }

        // FreeChat + ChatSent -> FreeChat
        Event::ChatSent { text, reply, at } => {
            accepts(state, Input::Chat, &text)?;
            let next = exchange(state, text, reply, at);
            Ok(TransitionResult::new(next).with_effect(Effect::PersistLog))
        }

        // Any + Reset -> AwaitingName with nothing remembered
        Event::Reset => Ok(TransitionResult::new(state.cleared()).with_effect(Effect::DeleteLog)),
    }
}

/// User text plus reply; every exchange lands in `FreeChat`
fn exchange(
    state: &ConversationState,
    text: String,
    reply: Reply,
    at: chrono::DateTime<chrono::Local>,
) -> ConversationState {
    let mut next = state.clone();
    next.push(Role::User, text, at);
    next.push(Role::Bot, reply.into_text(), at);
    next.stage = Stage::FreeChat;
    next
}
