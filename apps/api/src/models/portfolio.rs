use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::resume::StructuredResume;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub method: String,
    pub status: String,
    pub content: Option<Value>,
    pub html: Option<String>,
    pub css: Option<String>,
    pub job_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a persisted portfolio or interview record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Processing,
    InProgress,
    Completed,
    Error,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Processing => "processing",
            RecordStatus::InProgress => "in_progress",
            RecordStatus::Completed => "completed",
            RecordStatus::Error => "error",
        }
    }
}

/// How the portfolio's source data was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioMethod {
    Resume,
    Chat,
}

impl PortfolioMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioMethod::Resume => "resume",
            PortfolioMethod::Chat => "chat",
        }
    }
}

/// Everything the assembly pipeline produced, stored as the row's `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioContent {
    pub title: String,
    pub about_me: String,
    pub skills_summary: String,
    pub resume: StructuredResume,
}

/// Terminal artifact of portfolio assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDocument {
    pub markup: String,
    pub stylesheet: String,
}
