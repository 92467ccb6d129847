//! Session runtime
//!
//! Each chat session owns its state, a reply provider and a CSV log store.
//! The manager hands out one mutex-guarded session per id so interactions
//! on the same session run one at a time while sessions stay independent.
//! Idle sessions are dropped from memory; their logs stay on disk and are
//! reloaded on the next request.

mod session;

#[cfg(test)]
pub mod testing;

pub use session::ChatSession;

use crate::responder::ResponseProvider;
use crate::storage::CsvChatLog;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Session type used by the server
pub type ProductionSession = ChatSession<Arc<dyn ResponseProvider>, CsvChatLog>;

/// Shared handle to a running session
pub type SessionHandle = Arc<Mutex<ProductionSession>>;

const MAX_SESSION_ID_LEN: usize = 64;

/// Default time a session stays in memory without requests
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default number of sessions kept in memory at once
pub const DEFAULT_MAX_LIVE_SESSIONS: usize = 1024;

/// Bounds on the in-memory session map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub idle_timeout: Duration,
    pub max_live: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_live: DEFAULT_MAX_LIVE_SESSIONS,
        }
    }
}

impl SessionLimits {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let idle_timeout = std::env::var("SEDULUR_SESSION_IDLE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(defaults.idle_timeout, Duration::from_secs);
        let max_live = std::env::var("SEDULUR_MAX_SESSIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_live);
        Self {
            idle_timeout,
            max_live,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session id {0:?}: use 1-64 letters, digits, '-' or '_'")]
    InvalidId(String),
}

/// Session ids end up in file names, so only a safe alphabet is accepted
pub fn validate_session_id(id: &str) -> Result<(), SessionError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SessionError::InvalidId(id.to_string()))
    }
}

struct LiveSession {
    handle: SessionHandle,
    last_used: Instant,
}

impl LiveSession {
    /// A request still holds the handle
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.handle) > 1
    }
}

/// Manager for all live chat sessions
pub struct SessionManager {
    chat_dir: PathBuf,
    provider: Arc<dyn ResponseProvider>,
    reply_timeout: Duration,
    limits: SessionLimits,
    sessions: RwLock<HashMap<String, LiveSession>>,
}

impl SessionManager {
    pub fn new(
        chat_dir: impl Into<PathBuf>,
        provider: Arc<dyn ResponseProvider>,
        reply_timeout: Duration,
    ) -> Self {
        Self {
            chat_dir: chat_dir.into(),
            provider,
            reply_timeout,
            limits: SessionLimits::default(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Start a session under a fresh id
    pub async fn create(&self) -> (String, SessionHandle) {
        let id = uuid::Uuid::new_v4().to_string();
        let handle = self.open(&id).await;
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, now);
        sessions.insert(
            id.clone(),
            LiveSession {
                handle: handle.clone(),
                last_used: now,
            },
        );
        (id, handle)
    }

    /// Get a live session, or open it from its stored log
    pub async fn get_or_create(&self, id: &str) -> Result<SessionHandle, SessionError> {
        validate_session_id(id)?;

        {
            let mut sessions = self.sessions.write().await;
            if let Some(live) = sessions.get_mut(id) {
                live.last_used = Instant::now();
                return Ok(live.handle.clone());
            }
        }

        let handle = self.open(id).await;
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, now);
        // Another request may have opened it while the log was loading
        let live = sessions.entry(id.to_string()).or_insert(LiveSession {
            handle,
            last_used: now,
        });
        live.last_used = now;
        Ok(live.handle.clone())
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop idle sessions, then the least recently used ones until there is
    /// room for one more. Sessions a request still holds are never dropped.
    fn evict(&self, sessions: &mut HashMap<String, LiveSession>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, live| {
            live.in_use() || now.duration_since(live.last_used) < self.limits.idle_timeout
        });

        if sessions.len() >= self.limits.max_live {
            let mut idle: Vec<(Instant, String)> = sessions
                .iter()
                .filter(|(_, live)| !live.in_use())
                .map(|(id, live)| (live.last_used, id.clone()))
                .collect();
            idle.sort_unstable();
            let excess = sessions.len() + 1 - self.limits.max_live;
            for (_, id) in idle.into_iter().take(excess) {
                sessions.remove(&id);
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, live = sessions.len(), "Evicted chat sessions");
        }
        if sessions.len() >= self.limits.max_live {
            tracing::warn!(live = sessions.len(), "All live chat sessions are busy");
        }
    }

    fn log_path(&self, id: &str) -> PathBuf {
        self.chat_dir.join(format!("{id}.csv"))
    }

    async fn open(&self, id: &str) -> SessionHandle {
        let store = CsvChatLog::new(self.log_path(id));
        tracing::debug!(session = %id, path = %store.path().display(), "Chat log location");
        let session = ChatSession::open(id, self.provider.clone(), store)
            .await
            .with_reply_timeout(self.reply_timeout);
        Arc::new(Mutex::new(session))
    }
}
