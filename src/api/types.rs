//! API request and response types

use crate::assessment::{BucketCounts, Category, DashboardSummary, ScoreReport};
use crate::state_machine::{ConversationState, ExportedMessage, Role, Stage};
use serde::{Deserialize, Serialize};

/// Body of every conversational input
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Raw answer vector; validated by the scorer
#[derive(Debug, Deserialize)]
pub struct AnswersRequest {
    pub answers: Vec<i64>,
    /// Date of a stored report being downloaded again, `%Y-%m-%d %H:%M:%S`
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Scored assessment with its downloadable text, both from the stored report
#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    #[serde(flatten)]
    pub report: ScoreReport,
    pub report_text: String,
}

/// One log entry as shown to clients
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub role: Role,
    pub text: String,
    pub sequence_id: u64,
    /// RFC 3339, absent for restored history
    pub timestamp: Option<String>,
}

/// Session state as shown to clients
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub stage: Stage,
    pub user_name: Option<String>,
    pub messages: Vec<MessageView>,
}

impl SessionResponse {
    pub fn new(session_id: &str, state: &ConversationState) -> Self {
        Self {
            session_id: session_id.to_string(),
            stage: state.stage,
            user_name: state.user_name.clone(),
            messages: state
                .message_log
                .iter()
                .map(|m| MessageView {
                    role: m.role,
                    text: m.text.clone(),
                    sequence_id: m.sequence_id,
                    timestamp: m.timestamp.map(|t| t.to_rfc3339()),
                })
                .collect(),
        }
    }
}

/// Downloadable log
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub messages: Vec<ExportedMessage>,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub name: Category,
    pub questions: Vec<usize>,
}

/// Questionnaire shown before the test
#[derive(Debug, Serialize)]
pub struct AssessmentCatalogResponse {
    pub questions: Vec<&'static str>,
    pub options: Vec<&'static str>,
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub analysis: BucketCounts,
    pub summary: DashboardSummary,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
