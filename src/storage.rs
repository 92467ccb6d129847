//! Durable storage for chat logs and assessment results
//!
//! Both stores are plain files: a two-column CSV per chat session and one
//! JSON array holding every score report.

mod chat_log;
mod results;

#[allow(unused_imports)] // Public API re-exports
pub use chat_log::{decode_chat_csv, encode_chat_csv, CsvChatLog, CHAT_CSV_HEADER};
pub use results::JsonResultStore;

use crate::assessment::ScoreReport;
use crate::state_machine::{Message, Role};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed chat log at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage for one session's chat log
#[async_trait]
pub trait ChatLogStore: Send + Sync {
    /// Replace the stored log with `messages`
    async fn save(&self, messages: &[Message]) -> StorageResult<()>;

    /// Read back the stored log; a missing artifact is an empty log
    async fn load(&self) -> StorageResult<Vec<(Role, String)>>;

    /// Remove the artifact; removing a missing artifact succeeds
    async fn delete(&self) -> StorageResult<()>;
}

/// Append-only collection of score reports
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Add a report, creating the collection if needed
    async fn append(&self, report: &ScoreReport) -> StorageResult<()>;

    /// Every stored report in insertion order; a missing artifact is empty
    async fn load_all(&self) -> StorageResult<Vec<ScoreReport>>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ChatLogStore + ?Sized> ChatLogStore for Arc<T> {
    async fn save(&self, messages: &[Message]) -> StorageResult<()> {
        (**self).save(messages).await
    }

    async fn load(&self) -> StorageResult<Vec<(Role, String)>> {
        (**self).load().await
    }

    async fn delete(&self) -> StorageResult<()> {
        (**self).delete().await
    }
}

#[async_trait]
impl<T: ResultStore + ?Sized> ResultStore for Arc<T> {
    async fn append(&self, report: &ScoreReport) -> StorageResult<()> {
        (**self).append(report).await
    }

    async fn load_all(&self) -> StorageResult<Vec<ScoreReport>> {
        (**self).load_all().await
    }
}

/// Load reports for read-only views, treating storage trouble as "no results yet"
pub async fn load_reports_or_empty<R: ResultStore + ?Sized>(store: &R) -> Vec<ScoreReport> {
    match store.load_all().await {
        Ok(reports) => reports,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load score reports, showing none");
            Vec::new()
        }
    }
}
