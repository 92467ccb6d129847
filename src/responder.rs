//! Response provider abstraction
//!
//! Turns a user's free text into the bot's reply. The backend may fail in any
//! way; callers go through [`reply_or_fallback`] so a failure never reaches
//! the conversation as an error.

mod error;
mod rasa;

#[allow(unused_imports)] // Public API re-exports
pub use error::{ResponderError, ResponderErrorKind};
pub use rasa::RasaProvider;

use crate::state_machine::Reply;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Bot text used whenever the provider fails or times out
pub const FALLBACK_REPLY: &str = "Maaf, terjadi kesalahan. Bisakah Anda mencoba lagi?";

/// Default deadline for a single reply
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Common interface for dialogue backends
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    /// Produce a reply to `text`. `sender` identifies the conversation so
    /// backends that track dialogue state can keep sessions apart.
    async fn respond(&self, sender: &str, text: &str) -> Result<String, ResponderError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: ResponseProvider + ?Sized> ResponseProvider for Arc<T> {
    async fn respond(&self, sender: &str, text: &str) -> Result<String, ResponderError> {
        (**self).respond(sender, text).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Configuration for the dialogue backend
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    pub rasa_url: String,
    pub reply_timeout: Duration,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            rasa_url: "http://localhost:5005".to_string(),
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }
}

impl ResponderConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rasa_url: std::env::var("RASA_URL").unwrap_or(defaults.rasa_url),
            reply_timeout: std::env::var("RASA_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.reply_timeout, Duration::from_secs),
        }
    }

    /// Build the production provider, wrapped for logging
    pub fn build(&self) -> Result<Arc<dyn ResponseProvider>, ResponderError> {
        // The HTTP client deadline sits just past the reply deadline so the
        // runtime's timeout is the one that fires.
        let rasa = RasaProvider::new(&self.rasa_url, self.reply_timeout + Duration::from_secs(1))?;
        Ok(Arc::new(LoggingProvider::new(Arc::new(rasa))))
    }
}

/// Logging wrapper for providers
pub struct LoggingProvider {
    inner: Arc<dyn ResponseProvider>,
    name: String,
}

impl LoggingProvider {
    pub fn new(inner: Arc<dyn ResponseProvider>) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }
}

#[async_trait]
impl ResponseProvider for LoggingProvider {
    async fn respond(&self, sender: &str, text: &str) -> Result<String, ResponderError> {
        let start = std::time::Instant::now();
        let result = self.inner.respond(sender, text).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    provider = %self.name,
                    sender = %sender,
                    duration_ms = %duration.as_millis(),
                    reply_chars = reply.chars().count(),
                    "Reply received"
                );
            }
            Err(e) => {
                tracing::error!(
                    provider = %self.name,
                    sender = %sender,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "Reply request failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Ask the provider for a reply, bounded by `deadline`.
///
/// Errors and timeouts both collapse into [`FALLBACK_REPLY`].
pub async fn reply_or_fallback<P>(provider: &P, sender: &str, text: &str, deadline: Duration) -> Reply
where
    P: ResponseProvider + ?Sized,
{
    match timeout(deadline, provider.respond(sender, text)).await {
        Ok(Ok(reply)) => Reply::Provided(reply),
        Ok(Err(e)) => {
            tracing::warn!(sender = %sender, error = %e, kind = e.kind.as_str(), "Using fallback reply");
            Reply::Fallback(FALLBACK_REPLY.to_string())
        }
        Err(_) => {
            tracing::warn!(sender = %sender, timeout_ms = %deadline.as_millis(), "Reply timed out, using fallback");
            Reply::Fallback(FALLBACK_REPLY.to_string())
        }
    }
}
