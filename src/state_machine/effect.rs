//! Effects produced by state transitions

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Overwrite the durable chat log with the new message log
    PersistLog,

    /// Remove the durable chat-log artifact
    DeleteLog,
}
