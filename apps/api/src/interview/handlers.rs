//! Axum route handlers for the mock interview API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::{require_text, AppError};
use crate::generation::interview::{
    generate_interview_feedback, generate_interview_questions, score_interview, ScoreFormat,
    MAX_QUESTIONS, MIN_QUESTIONS,
};
use crate::interview::store::{complete_interview, get_interview, insert_interview, update_questions};
use crate::models::interview::{is_complete, InterviewQuestion, InterviewSessionRow};
use crate::models::portfolio::RecordStatus;
use crate::state::AppState;

const DEFAULT_QUESTION_COUNT: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateInterviewRequest {
    pub user_id: Uuid,
    pub job_description: String,
    pub level: String,
    #[serde(default)]
    pub question_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub index: usize,
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteParams {
    #[serde(default)]
    pub score_format: ScoreFormat,
}

fn question_count(requested: Option<usize>) -> Result<usize, AppError> {
    let count = requested.unwrap_or(DEFAULT_QUESTION_COUNT);
    if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&count) {
        return Err(AppError::Validation(format!(
            "question_count must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}"
        )));
    }
    Ok(count)
}

/// Only `in_progress` sessions accept answers or completion.
fn ensure_in_progress(session: &InterviewSessionRow) -> Result<(), AppError> {
    if session.status != RecordStatus::InProgress.as_str() {
        return Err(AppError::Conflict(format!(
            "Interview {} is already {}",
            session.id, session.status
        )));
    }
    Ok(())
}

fn apply_answer(
    questions: &mut [InterviewQuestion],
    index: usize,
    answer: &str,
) -> Result<(), AppError> {
    let total = questions.len();
    let question = questions.get_mut(index).ok_or_else(|| {
        AppError::Validation(format!("index {index} is out of range (0..{total})"))
    })?;
    question.answer = Some(answer.trim().to_string());
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    Json(request): Json<CreateInterviewRequest>,
) -> Result<Json<InterviewSessionRow>, AppError> {
    require_text("job_description", &request.job_description)?;
    require_text("level", &request.level)?;
    let count = question_count(request.question_count)?;

    let questions = generate_interview_questions(
        state.llm.as_ref(),
        &request.job_description,
        request.level.trim(),
        count,
    )
    .await?
    .into_iter()
    .map(InterviewQuestion::new)
    .collect::<Vec<_>>();

    let session = insert_interview(
        &state.db,
        request.user_id,
        &request.job_description,
        request.level.trim(),
        &questions,
    )
    .await?;

    info!("Interview {} created with {} questions", session.id, count);
    Ok(Json(session))
}

/// GET /api/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<InterviewSessionRow>, AppError> {
    Ok(Json(find_interview(&state, interview_id).await?))
}

/// POST /api/interviews/:id/answers
pub async fn handle_answer_question(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<InterviewSessionRow>, AppError> {
    require_text("answer", &request.answer)?;

    let session = find_interview(&state, interview_id).await?;
    ensure_in_progress(&session)?;

    let mut questions = session.questions.0;
    apply_answer(&mut questions, request.index, &request.answer)?;

    let updated = update_questions(&state.db, interview_id, &questions).await?;
    Ok(Json(updated))
}

/// POST /api/interviews/:id/complete?score_format=bare_integer|json_object
///
/// Scores strictly, then generates feedback. A rejected score leaves the
/// session `in_progress` so completion can be retried.
pub async fn handle_complete_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Query(params): Query<CompleteParams>,
) -> Result<Json<InterviewSessionRow>, AppError> {
    let session = find_interview(&state, interview_id).await?;
    ensure_in_progress(&session)?;

    let questions = &session.questions.0;
    if !is_complete(questions) {
        let unanswered = questions.iter().filter(|q| !q.is_answered()).count();
        return Err(AppError::Validation(format!(
            "{unanswered} question(s) still unanswered"
        )));
    }

    let score = score_interview(state.llm.as_ref(), questions, params.score_format).await?;
    let feedback = generate_interview_feedback(state.llm.as_ref(), questions, score).await?;

    // score is range-checked to 0..=100
    let completed = complete_interview(&state.db, interview_id, score as i32, &feedback).await?;

    info!("Interview {} completed with score {}", interview_id, score);
    Ok(Json(completed))
}

async fn find_interview(state: &AppState, interview_id: Uuid) -> Result<InterviewSessionRow, AppError> {
    get_interview(&state.db, interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))
}
