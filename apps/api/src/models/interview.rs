use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl InterviewQuestion {
    pub fn new(question: String) -> Self {
        Self {
            question,
            answer: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.answer.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}

/// Complete when every question carries a non-blank answer.
pub fn is_complete(questions: &[InterviewQuestion]) -> bool {
    questions.iter().all(InterviewQuestion::is_answered)
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InterviewSessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_description: String,
    pub level: String,
    pub questions: Json<Vec<InterviewQuestion>>,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
