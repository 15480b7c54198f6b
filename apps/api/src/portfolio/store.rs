//! PostgreSQL persistence for portfolio records.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::portfolio::{PortfolioMethod, PortfolioRow, RecordStatus};
use crate::portfolio::assembly::AssembledPortfolio;

pub struct NewPortfolio<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub method: PortfolioMethod,
    pub status: RecordStatus,
    pub job_description: Option<&'a str>,
}

pub async fn insert_portfolio(db: &PgPool, new: NewPortfolio<'_>) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO portfolios (id, user_id, title, method, status, job_description)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(new.user_id)
    .bind(new.title)
    .bind(new.method.as_str())
    .bind(new.status.as_str())
    .bind(new.job_description)
    .execute(db)
    .await?;
    Ok(id)
}

pub async fn set_status(db: &PgPool, id: Uuid, status: RecordStatus) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE portfolios SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status.as_str())
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Moves the record from `from` to `to` only if it is still in `from`.
/// Returns whether this call made the transition.
pub async fn transition_status(
    db: &PgPool,
    id: Uuid,
    from: RecordStatus,
    to: RecordStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE portfolios SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3",
    )
    .bind(to.as_str())
    .bind(id)
    .bind(from.as_str())
    .execute(db)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Stores the assembled content and markup and marks the record `completed`.
pub async fn save_assembled(
    db: &PgPool,
    id: Uuid,
    assembled: &AssembledPortfolio,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE portfolios
        SET content = $1, html = $2, css = $3, status = $4, updated_at = NOW()
        WHERE id = $5
        "#,
    )
    .bind(Json(&assembled.content))
    .bind(&assembled.document.markup)
    .bind(&assembled.document.stylesheet)
    .bind(RecordStatus::Completed.as_str())
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn get_portfolio(db: &PgPool, id: Uuid) -> Result<Option<PortfolioRow>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioRow>("SELECT * FROM portfolios WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Most recent first.
pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<PortfolioRow>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioRow>(
        "SELECT * FROM portfolios WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Chat session audit rows
// ────────────────────────────────────────────────────────────────────────────

/// Records that a chat-driven portfolio started. Answers themselves live in Redis.
pub async fn insert_chat_session(db: &PgPool, portfolio_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO chat_sessions (id, portfolio_id, current_question, status)
        VALUES ($1, $2, 0, $3)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(portfolio_id)
    .bind(RecordStatus::InProgress.as_str())
    .execute(db)
    .await?;
    Ok(())
}

pub async fn update_chat_progress(
    db: &PgPool,
    portfolio_id: Uuid,
    current_question: i32,
    status: RecordStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE chat_sessions
        SET current_question = $1, status = $2, updated_at = NOW()
        WHERE portfolio_id = $3
        "#,
    )
    .bind(current_question)
    .bind(status.as_str())
    .bind(portfolio_id)
    .execute(db)
    .await?;
    Ok(())
}
