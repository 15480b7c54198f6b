use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Holds chat interview progress between answers.
    pub redis: RedisClient,
    /// Pluggable generation backend. Default: Groq-backed `LlmClient`.
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
}
