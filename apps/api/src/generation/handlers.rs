//! Axum route handlers for the career tooling API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{require_text, AppError};
use crate::generation::career::{generate_career_guide, generate_cover_letter, optimize_resume};
use crate::generation::job_analysis::{analyze_job_description, JobAnalysis};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJobResponse {
    pub analysis: JobAnalysis,
}

/// Shared body for the endpoints that pair a resume with a job.
#[derive(Debug, Deserialize)]
pub struct ResumeJobRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResumeResponse {
    pub optimized_resume: String,
    pub analysis: JobAnalysis,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

#[derive(Debug, Serialize)]
pub struct CareerGuideResponse {
    pub career_guide: String,
}

impl ResumeJobRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_text("resume_text", &self.resume_text)?;
        require_text("job_description", &self.job_description)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/career/analyze-job
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    require_text("job_description", &request.job_description)?;

    let analysis = analyze_job_description(state.llm.as_ref(), &request.job_description).await?;

    Ok(Json(AnalyzeJobResponse { analysis }))
}

/// POST /api/career/optimize-resume
///
/// Analyzes the job first, then rewrites the resume against that analysis.
pub async fn handle_optimize_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeJobRequest>,
) -> Result<Json<OptimizeResumeResponse>, AppError> {
    request.validate()?;

    let analysis = analyze_job_description(state.llm.as_ref(), &request.job_description).await?;
    let optimized_resume =
        optimize_resume(state.llm.as_ref(), &request.resume_text, &analysis).await?;

    Ok(Json(OptimizeResumeResponse {
        optimized_resume,
        analysis,
    }))
}

/// POST /api/career/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<ResumeJobRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    request.validate()?;

    let cover_letter = generate_cover_letter(
        state.llm.as_ref(),
        &request.job_description,
        &request.resume_text,
    )
    .await?;

    Ok(Json(CoverLetterResponse { cover_letter }))
}

/// POST /api/career/career-guide
pub async fn handle_career_guide(
    State(state): State<AppState>,
    Json(request): Json<ResumeJobRequest>,
) -> Result<Json<CareerGuideResponse>, AppError> {
    request.validate()?;

    let career_guide = generate_career_guide(
        state.llm.as_ref(),
        &request.job_description,
        &request.resume_text,
    )
    .await?;

    Ok(Json(CareerGuideResponse { career_guide }))
}
