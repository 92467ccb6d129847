//! Mock implementations for testing
//!
//! These mocks enable session and handler tests without a Rasa server or
//! real files.

use crate::assessment::ScoreReport;
use crate::responder::{ResponderError, ResponseProvider};
use crate::state_machine::{ExportedMessage, Message, Role};
use crate::storage::{ChatLogStore, ResultStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Mock Providers
// ============================================================================

/// Provider that returns queued replies and records every request
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<String, ResponderError>>>,
    /// (sender, text) of every request made
    pub requests: Mutex<Vec<(String, String)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: &str) {
        self.responses.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    /// Queue an error
    pub fn queue_error(&self, error: ResponderError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseProvider for MockProvider {
    async fn respond(&self, sender: &str, text: &str) -> Result<String, ResponderError> {
        self.requests
            .lock()
            .unwrap()
            .push((sender.to_string(), text.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ResponderError::network("No mock reply queued")))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Provider that answers only after a delay
pub struct SlowProvider {
    delay: Duration,
    reply: String,
}

impl SlowProvider {
    pub fn new(delay: Duration, reply: &str) -> Self {
        Self {
            delay,
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl ResponseProvider for SlowProvider {
    async fn respond(&self, _sender: &str, _text: &str) -> Result<String, ResponderError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

// ============================================================================
// In-Memory Stores
// ============================================================================

/// Chat log kept in memory, with call counters
#[derive(Default)]
pub struct MemoryChatLog {
    saved: Mutex<Vec<ExportedMessage>>,
    history: Mutex<Vec<(Role, String)>>,
    saves: Mutex<usize>,
    deletes: Mutex<usize>,
}

impl MemoryChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds a log from an earlier run
    pub fn with_history(history: Vec<(Role, String)>) -> Self {
        Self {
            history: Mutex::new(history),
            ..Self::default()
        }
    }

    /// Contents of the last save
    pub fn saved(&self) -> Vec<ExportedMessage> {
        self.saved.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub fn delete_count(&self) -> usize {
        *self.deletes.lock().unwrap()
    }
}

#[async_trait]
impl ChatLogStore for MemoryChatLog {
    async fn save(&self, messages: &[Message]) -> StorageResult<()> {
        let rows: Vec<ExportedMessage> = messages.iter().map(ExportedMessage::from).collect();
        *self.history.lock().unwrap() = rows.iter().map(|r| (r.role, r.text.clone())).collect();
        *self.saved.lock().unwrap() = rows;
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    async fn load(&self) -> StorageResult<Vec<(Role, String)>> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn delete(&self) -> StorageResult<()> {
        self.saved.lock().unwrap().clear();
        self.history.lock().unwrap().clear();
        *self.deletes.lock().unwrap() += 1;
        Ok(())
    }
}

fn unavailable() -> StorageError {
    StorageError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "store unavailable"))
}

/// Chat log whose every operation fails
pub struct FailingChatLog;

#[async_trait]
impl ChatLogStore for FailingChatLog {
    async fn save(&self, _messages: &[Message]) -> StorageResult<()> {
        Err(unavailable())
    }

    async fn load(&self) -> StorageResult<Vec<(Role, String)>> {
        Err(unavailable())
    }

    async fn delete(&self) -> StorageResult<()> {
        Err(unavailable())
    }
}

/// Result collection kept in memory
#[derive(Default)]
pub struct MemoryResultStore {
    reports: Mutex<Vec<ScoreReport>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<ScoreReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn append(&self, report: &ScoreReport) -> StorageResult<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }

    async fn load_all(&self) -> StorageResult<Vec<ScoreReport>> {
        Ok(self.reports())
    }
}

/// Result collection whose every operation fails
pub struct FailingResultStore;

#[async_trait]
impl ResultStore for FailingResultStore {
    async fn append(&self, _report: &ScoreReport) -> StorageResult<()> {
        Err(unavailable())
    }

    async fn load_all(&self) -> StorageResult<Vec<ScoreReport>> {
        Err(unavailable())
    }
}
