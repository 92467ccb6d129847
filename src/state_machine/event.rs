//! Events that can occur in a conversation

use chrono::{DateTime, Local};

/// Reply obtained from the response provider, already resolved.
///
/// `Fallback` carries the apology text substituted for a failed or timed-out
/// provider call; the conversation advances the same way in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Provided(String),
    Fallback(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Provided(text) | Reply::Fallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Provided(text) | Reply::Fallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Reply::Fallback(_))
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// The user introduced themselves
    NameSubmitted { name: String, at: DateTime<Local> },

    /// First free-text answer to the feeling prompt
    FeelingShared {
        text: String,
        reply: Reply,
        at: DateTime<Local>,
    },

    /// Any later chat turn
    ChatSent {
        text: String,
        reply: Reply,
        at: DateTime<Local>,
    },

    /// Forget the conversation
    Reset,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::NameSubmitted { .. } => "name_submitted",
            Event::FeelingShared { .. } => "feeling_shared",
            Event::ChatSent { .. } => "chat_sent",
            Event::Reset => "reset",
        }
    }
}
