//! Conversation state types

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Messages
// ============================================================================

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Bot => "Bot",
        }
    }

    /// Parse the label used in the chat-log artifact
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "User" => Some(Role::User),
            "Bot" => Some(Role::Bot),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of the chat log. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub sequence_id: u64,
    /// `None` for history restored from the chat log, which stores no times
    pub timestamp: Option<DateTime<Local>>,
}

/// Download view of a message: no identifiers, no timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedMessage {
    pub role: Role,
    pub text: String,
}

impl From<&Message> for ExportedMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            text: message.text.clone(),
        }
    }
}

// ============================================================================
// Conversation State
// ============================================================================

/// Which input the conversation solicits next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Waiting for the user to introduce themselves
    #[default]
    AwaitingName,
    /// Greeted; waiting for how the user feels today
    AwaitingFeeling,
    /// Open conversation, only a reset leaves this stage
    FreeChat,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::AwaitingName => "awaiting_name",
            Stage::AwaitingFeeling => "awaiting_feeling",
            Stage::FreeChat => "free_chat",
        }
    }

    /// Position in the forward-only ordering of stages
    #[cfg(test)]
    pub fn rank(self) -> u8 {
        match self {
            Stage::AwaitingName => 0,
            Stage::AwaitingFeeling => 1,
            Stage::FreeChat => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub stage: Stage,
    pub user_name: Option<String>,
    pub message_log: Vec<Message>,
    /// Sequence number handed to the next appended message
    #[serde(skip)]
    next_sequence: u64,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            stage: Stage::AwaitingName,
            user_name: None,
            message_log: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Rebuild a session around a previously persisted log.
    ///
    /// The stage always restarts at `AwaitingName`; only the history survives.
    /// Restored messages carry no timestamp.
    pub fn resume(history: Vec<(Role, String)>) -> Self {
        let mut state = Self::new();
        for (role, text) in history {
            state.append(role, text, None);
        }
        state
    }

    pub(crate) fn push(&mut self, role: Role, text: impl Into<String>, at: DateTime<Local>) {
        self.append(role, text.into(), Some(at));
    }

    fn append(&mut self, role: Role, text: String, timestamp: Option<DateTime<Local>>) {
        self.message_log.push(Message {
            role,
            text,
            sequence_id: self.next_sequence,
            timestamp,
        });
        self.next_sequence += 1;
    }

    /// Clear everything but keep sequence numbers moving forward
    pub(crate) fn cleared(&self) -> Self {
        Self {
            next_sequence: self.next_sequence,
            ..Self::new()
        }
    }

    /// Snapshot of the log for download
    pub fn export_log(&self) -> Vec<ExportedMessage> {
        self.message_log.iter().map(ExportedMessage::from).collect()
    }

    #[cfg(test)]
    pub fn is_pristine(&self) -> bool {
        self.stage == Stage::AwaitingName
            && self.user_name.is_none()
            && self.message_log.is_empty()
    }
}
