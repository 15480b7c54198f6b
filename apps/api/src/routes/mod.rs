pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extract::handlers as extract;
use crate::generation::handlers as career;
use crate::interview::handlers as interview;
use crate::portfolio::handlers as portfolio;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Portfolio API
        .route(
            "/api/portfolios/resume",
            post(portfolio::handle_create_from_resume),
        )
        .route(
            "/api/portfolios/chat/start",
            post(portfolio::handle_chat_start),
        )
        .route(
            "/api/portfolios/chat/answer",
            post(portfolio::handle_chat_answer),
        )
        .route("/api/portfolios/:id", get(portfolio::handle_get_portfolio))
        .route(
            "/api/portfolios/:id/export",
            get(portfolio::handle_export_portfolio),
        )
        .route(
            "/api/users/:user_id/portfolios",
            get(portfolio::handle_list_user_portfolios),
        )
        .route("/portfolio/:id", get(portfolio::handle_view_portfolio))
        // Resume text extraction
        .route("/api/resumes/extract", post(extract::handle_extract_resume))
        // Career tooling
        .route("/api/career/analyze-job", post(career::handle_analyze_job))
        .route(
            "/api/career/optimize-resume",
            post(career::handle_optimize_resume),
        )
        .route("/api/career/cover-letter", post(career::handle_cover_letter))
        .route("/api/career/career-guide", post(career::handle_career_guide))
        // Mock interviews
        .route("/api/interviews", post(interview::handle_create_interview))
        .route("/api/interviews/:id", get(interview::handle_get_interview))
        .route(
            "/api/interviews/:id/answers",
            post(interview::handle_answer_question),
        )
        .route(
            "/api/interviews/:id/complete",
            post(interview::handle_complete_interview),
        )
        .with_state(state)
}
