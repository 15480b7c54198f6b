//! PostgreSQL persistence for mock interview sessions.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::interview::{InterviewQuestion, InterviewSessionRow};
use crate::models::portfolio::RecordStatus;

pub async fn insert_interview(
    db: &PgPool,
    user_id: Uuid,
    job_description: &str,
    level: &str,
    questions: &[InterviewQuestion],
) -> Result<InterviewSessionRow, sqlx::Error> {
    sqlx::query_as::<_, InterviewSessionRow>(
        r#"
        INSERT INTO interview_sessions (id, user_id, job_description, level, questions, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(job_description)
    .bind(level)
    .bind(Json(questions))
    .bind(RecordStatus::InProgress.as_str())
    .fetch_one(db)
    .await
}

pub async fn get_interview(
    db: &PgPool,
    id: Uuid,
) -> Result<Option<InterviewSessionRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewSessionRow>("SELECT * FROM interview_sessions WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn update_questions(
    db: &PgPool,
    id: Uuid,
    questions: &[InterviewQuestion],
) -> Result<InterviewSessionRow, sqlx::Error> {
    sqlx::query_as::<_, InterviewSessionRow>(
        r#"
        UPDATE interview_sessions
        SET questions = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(Json(questions))
    .bind(id)
    .fetch_one(db)
    .await
}

pub async fn complete_interview(
    db: &PgPool,
    id: Uuid,
    score: i32,
    feedback: &str,
) -> Result<InterviewSessionRow, sqlx::Error> {
    sqlx::query_as::<_, InterviewSessionRow>(
        r#"
        UPDATE interview_sessions
        SET score = $1, feedback = $2, status = $3, updated_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(score)
    .bind(feedback)
    .bind(RecordStatus::Completed.as_str())
    .bind(id)
    .fetch_one(db)
    .await
}
