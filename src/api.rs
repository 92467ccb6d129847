//! HTTP API for the chatbot, questionnaire and complaint form

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::SessionManager;
use crate::storage::ResultStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub results: Arc<dyn ResultStore>,
}

impl AppState {
    pub fn new(sessions: SessionManager, results: Arc<dyn ResultStore>) -> Self {
        Self {
            sessions: Arc::new(sessions),
            results,
        }
    }
}
