//! Score reports as one JSON array on disk

use super::{ResultStore, StorageResult};
use crate::assessment::ScoreReport;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Append-only JSON results collection.
///
/// Appends are serialized through an async mutex and land via temp file +
/// rename, so concurrent sessions never lose each other's reports.
#[derive(Debug)]
pub struct JsonResultStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> StorageResult<Option<Vec<ScoreReport>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, reports: &[ScoreReport]) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(reports)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ResultStore for JsonResultStore {
    async fn append(&self, report: &ScoreReport) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut reports = self.read().await?.unwrap_or_default();
        reports.push(report.clone());
        self.write(&reports).await?;

        tracing::debug!(path = %self.path.display(), total = reports.len(), "Score report appended");
        Ok(())
    }

    async fn load_all(&self) -> StorageResult<Vec<ScoreReport>> {
        Ok(self.read().await?.unwrap_or_default())
    }
}
