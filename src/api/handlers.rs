//! HTTP request handlers

use super::types::{
    AnswersRequest, AssessmentCatalogResponse, AssessmentResponse, CategoryInfo, DashboardResponse, ErrorResponse,
    ExportResponse, SessionResponse, TextRequest,
};
use super::AppState;
use crate::assessment::{
    analyze_test_results, dashboard_summary, render_report, score_answers, Answers,
    AssessmentError, Category, ANSWER_OPTIONS, QUESTIONS, REPORT_FILE_NAME, TIMESTAMP_FORMAT,
};
use crate::complaint::{render_summary, Complaint, SUMMARY_FILE_NAME};
use crate::insights::{conversation_insights, ConversationInsights};
use crate::runtime::{SessionError, SessionHandle};
use crate::state_machine::TransitionError;
use crate::storage::load_reports_or_empty;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat sessions
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/name", post(submit_name))
        .route("/api/sessions/:id/feeling", post(submit_feeling))
        .route("/api/sessions/:id/chat", post(submit_chat))
        .route("/api/sessions/:id/reset", post(reset_session))
        // Downloads and insights
        .route("/api/sessions/:id/export", get(export_session))
        .route("/api/sessions/:id/export.csv", get(export_session_csv))
        .route("/api/sessions/:id/insights", get(session_insights))
        // Questionnaire
        .route("/api/assessment", get(assessment_catalog).post(submit_assessment))
        .route("/api/assessment/report", post(assessment_report))
        .route("/api/dashboard", get(dashboard))
        // Complaint form
        .route("/api/complaints/summary", post(complaint_summary))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat Sessions
// ============================================================

async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let (id, handle) = state.sessions.create().await;
    let session = handle.lock().await;
    tracing::info!(session = %id, "Session created");
    (
        StatusCode::CREATED,
        Json(SessionResponse::new(&id, session.state())),
    )
}

async fn session(state: &AppState, id: &str) -> Result<SessionHandle, AppError> {
    Ok(state.sessions.get_or_create(id).await?)
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionResponse::new(&id, session.state())))
}

async fn submit_name(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let mut session = handle.lock().await;
    let updated = session.submit_name(&req.text).await?;
    Ok(Json(SessionResponse::new(&id, updated)))
}

async fn submit_feeling(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let mut session = handle.lock().await;
    let updated = session.submit_feeling(&req.text).await?;
    Ok(Json(SessionResponse::new(&id, updated)))
}

async fn submit_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let mut session = handle.lock().await;
    let updated = session.submit_chat(&req.text).await?;
    Ok(Json(SessionResponse::new(&id, updated)))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let mut session = handle.lock().await;
    let updated = session.reset().await;
    tracing::info!(session = %id, "Session reset");
    Ok(Json(SessionResponse::new(&id, updated)))
}

async fn export_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExportResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let session = handle.lock().await;
    Ok(Json(ExportResponse {
        messages: session.export_log(),
    }))
}

async fn export_session_csv(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let handle = session(&state, &id).await?;
    let body = handle.lock().await.export_csv();
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"chat_history.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

async fn session_insights(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationInsights>, AppError> {
    let handle = session(&state, &id).await?;
    let session = handle.lock().await;
    Ok(Json(conversation_insights(&session.state().message_log)))
}

// ============================================================
// Questionnaire
// ============================================================

async fn assessment_catalog() -> Json<AssessmentCatalogResponse> {
    Json(AssessmentCatalogResponse {
        questions: QUESTIONS.to_vec(),
        options: ANSWER_OPTIONS.to_vec(),
        categories: Category::ALL
            .into_iter()
            .map(|category| CategoryInfo {
                name: category,
                questions: category.question_indices().to_vec(),
            })
            .collect(),
    })
}

async fn submit_assessment(
    State(state): State<AppState>,
    Json(req): Json<AnswersRequest>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let answers = Answers::try_from(req.answers.as_slice())?;
    let report = score_answers(&answers, Local::now().naive_local());

    // The caller still gets the result when it could not be stored
    if let Err(e) = state.results.append(&report).await {
        tracing::warn!(error = %e, "Failed to store score report");
    }
    tracing::info!(
        percentage = report.percentage,
        tier = ?report.severity_tier,
        "Assessment scored"
    );
    let report_text = render_report(&report, &answers);
    Ok(Json(AssessmentResponse {
        report,
        report_text,
    }))
}

/// Text download; pass the stored report's timestamp to reproduce it exactly
async fn assessment_report(Json(req): Json<AnswersRequest>) -> Result<Response, AppError> {
    let answers = Answers::try_from(req.answers.as_slice())?;
    let at = match req.timestamp.as_deref() {
        Some(raw) => NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map_err(|e| AppError::BadRequest(format!("Invalid timestamp {raw:?}: {e}")))?,
        None => Local::now().naive_local(),
    };
    let report = score_answers(&answers, at);
    Ok(text_download(render_report(&report, &answers), REPORT_FILE_NAME))
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let reports = load_reports_or_empty(state.results.as_ref()).await;
    Json(DashboardResponse {
        analysis: analyze_test_results(&reports),
        summary: dashboard_summary(&reports),
    })
}

// ============================================================
// Complaint Form
// ============================================================

async fn complaint_summary(Json(complaint): Json<Complaint>) -> Response {
    tracing::info!(kind = %complaint.kind, "Complaint summary requested");
    text_download(render_summary(&complaint), SUMMARY_FILE_NAME)
}

fn text_download(body: String, file_name: &str) -> Response {
    (
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("sedulur-rasa ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Conflict(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::EmptyInput => AppError::BadRequest(e.to_string()),
            TransitionError::InvalidStage { .. } => AppError::Conflict(e.to_string()),
        }
    }
}

impl From<AssessmentError> for AppError {
    fn from(e: AssessmentError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
