//! Axum route handlers for the Portfolio API.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{require_text, AppError};
use crate::extract::handlers::read_resume_upload;
use crate::models::portfolio::{PortfolioMethod, PortfolioRow, RecordStatus};
use crate::parsing::chat::{ChatSession, CHAT_QUESTIONS};
use crate::portfolio::jobs::{spawn_assembly, AssemblySource};
use crate::portfolio::session::{delete_session, load_session, save_session};
use crate::portfolio::store::{
    get_portfolio, insert_chat_session, insert_portfolio, list_for_user, transition_status,
    update_chat_progress, NewPortfolio,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeUploadParams {
    pub user_id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessingResponse {
    pub portfolio_id: Uuid,
    pub status: &'static str,
    pub view_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatStartRequest {
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatStartResponse {
    pub portfolio_id: Uuid,
    pub question: &'static str,
    pub question_index: usize,
    pub total_questions: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatAnswerRequest {
    pub portfolio_id: Uuid,
    /// May be blank to skip a section.
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct ChatAnswerResponse {
    pub portfolio_id: Uuid,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub html: String,
    pub css: String,
}

fn view_url(portfolio_id: Uuid) -> String {
    format!("/portfolio/{portfolio_id}")
}

/// Normalizes an optional text field: blank means absent.
fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/portfolios/resume?user_id=..&title=..
///
/// Multipart: `file` (.pdf/.docx), optional `job_description`.
/// Inserts a `processing` record and generates the portfolio in the background.
pub async fn handle_create_from_resume(
    State(state): State<AppState>,
    Query(params): Query<ResumeUploadParams>,
    multipart: Multipart,
) -> Result<Json<ProcessingResponse>, AppError> {
    require_text("title", &params.title)?;
    let upload = read_resume_upload(multipart).await?;

    let portfolio_id = insert_portfolio(
        &state.db,
        NewPortfolio {
            user_id: params.user_id,
            title: params.title.trim(),
            method: PortfolioMethod::Resume,
            status: RecordStatus::Processing,
            job_description: upload.job_description.as_deref(),
        },
    )
    .await?;

    info!(
        "Portfolio {} queued from '{}' for user {}",
        portfolio_id, upload.filename, params.user_id
    );

    spawn_assembly(
        state,
        portfolio_id,
        AssemblySource::Upload {
            bytes: upload.bytes,
            kind: upload.kind,
        },
        upload.job_description,
    );

    Ok(Json(ProcessingResponse {
        portfolio_id,
        status: RecordStatus::Processing.as_str(),
        view_url: view_url(portfolio_id),
    }))
}

/// POST /api/portfolios/chat/start
pub async fn handle_chat_start(
    State(state): State<AppState>,
    Json(request): Json<ChatStartRequest>,
) -> Result<Json<ChatStartResponse>, AppError> {
    require_text("title", &request.title)?;
    let job_description = non_blank(request.job_description);

    let portfolio_id = insert_portfolio(
        &state.db,
        NewPortfolio {
            user_id: request.user_id,
            title: request.title.trim(),
            method: PortfolioMethod::Chat,
            status: RecordStatus::InProgress,
            job_description: job_description.as_deref(),
        },
    )
    .await?;
    insert_chat_session(&state.db, portfolio_id).await?;

    let session = ChatSession::new(portfolio_id, request.user_id, job_description);
    save_session(&state.redis, &session, state.config.chat_session_ttl_secs).await?;

    info!("Chat portfolio {} started for user {}", portfolio_id, request.user_id);

    Ok(Json(ChatStartResponse {
        portfolio_id,
        question: CHAT_QUESTIONS[0],
        question_index: 0,
        total_questions: CHAT_QUESTIONS.len(),
    }))
}

/// POST /api/portfolios/chat/answer
///
/// Records the answer. Returns the next question, or once the script is
/// finished hands the collected resume to background assembly.
pub async fn handle_chat_answer(
    State(state): State<AppState>,
    Json(request): Json<ChatAnswerRequest>,
) -> Result<Json<ChatAnswerResponse>, AppError> {
    let portfolio_id = request.portfolio_id;
    let mut session = load_session(&state.redis, portfolio_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Chat session {portfolio_id} not found")))?;

    let next_question = session.record_answer(&request.answer);
    let answered = session.answers.len() as i32;

    if let Some(question) = next_question {
        save_session(&state.redis, &session, state.config.chat_session_ttl_secs).await?;
        update_chat_progress(&state.db, portfolio_id, answered, RecordStatus::InProgress).await?;
        return Ok(Json(ChatAnswerResponse {
            portfolio_id,
            status: RecordStatus::InProgress.as_str(),
            question: Some(question),
            question_index: Some(session.answers.len()),
            view_url: None,
        }));
    }

    // The Redis session is removed only after hand-off.
    update_chat_progress(&state.db, portfolio_id, answered, RecordStatus::Completed).await?;
    let claimed = transition_status(
        &state.db,
        portfolio_id,
        RecordStatus::InProgress,
        RecordStatus::Processing,
    )
    .await?;
    claimed_or_conflict(claimed, portfolio_id)?;

    info!("Chat portfolio {} complete; assembling", portfolio_id);

    let redis = state.redis.clone();
    let resume = session.to_structured_resume();
    spawn_assembly(
        state,
        portfolio_id,
        AssemblySource::Chat(resume),
        session.job_description,
    );

    if let Err(e) = delete_session(&redis, portfolio_id).await {
        warn!("Chat session {} not cleared after hand-off: {}", portfolio_id, e);
    }

    Ok(Json(ChatAnswerResponse {
        portfolio_id,
        status: RecordStatus::Processing.as_str(),
        question: None,
        question_index: None,
        view_url: Some(view_url(portfolio_id)),
    }))
}

/// GET /api/portfolios/:id
pub async fn handle_get_portfolio(
    State(state): State<AppState>,
    Path(portfolio_id): Path<Uuid>,
) -> Result<Json<PortfolioRow>, AppError> {
    let portfolio = find_portfolio(&state, portfolio_id).await?;
    Ok(Json(portfolio))
}

/// GET /api/portfolios/:id/export
pub async fn handle_export_portfolio(
    State(state): State<AppState>,
    Path(portfolio_id): Path<Uuid>,
) -> Result<Json<ExportResponse>, AppError> {
    let portfolio = find_portfolio(&state, portfolio_id).await?;
    let (html, css) = completed_document(portfolio)?;
    Ok(Json(ExportResponse { html, css }))
}

/// GET /api/users/:user_id/portfolios
pub async fn handle_list_user_portfolios(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PortfolioRow>>, AppError> {
    let portfolios = list_for_user(&state.db, user_id).await?;
    Ok(Json(portfolios))
}

/// GET /portfolio/:id
///
/// Serves the rendered page.
pub async fn handle_view_portfolio(
    State(state): State<AppState>,
    Path(portfolio_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let portfolio = find_portfolio(&state, portfolio_id).await?;
    let (html, _) = completed_document(portfolio)?;
    Ok(Html(html))
}

/// Only the request that moved the record out of `in_progress` starts assembly.
fn claimed_or_conflict(claimed: bool, portfolio_id: Uuid) -> Result<(), AppError> {
    if claimed {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "Portfolio {portfolio_id} is already being assembled"
        )))
    }
}

async fn find_portfolio(state: &AppState, portfolio_id: Uuid) -> Result<PortfolioRow, AppError> {
    get_portfolio(&state.db, portfolio_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {portfolio_id} not found")))
}

/// The stored markup and stylesheet, or `Conflict` until generation has completed.
fn completed_document(portfolio: PortfolioRow) -> Result<(String, String), AppError> {
    if portfolio.status != RecordStatus::Completed.as_str() {
        return Err(AppError::Conflict(format!(
            "Portfolio {} is not ready (status: {})",
            portfolio.id, portfolio.status
        )));
    }
    Ok((
        portfolio.html.unwrap_or_default(),
        portfolio.css.unwrap_or_default(),
    ))
}
