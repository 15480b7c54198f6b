use anyhow::{Context, Result};

/// Default lifetime of a chat interview session in the session store.
const DEFAULT_CHAT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub groq_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// How long an unfinished chat session survives in Redis.
    pub chat_session_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            chat_session_ttl_secs: match std::env::var("CHAT_SESSION_TTL_SECS") {
                Ok(raw) => raw
                    .parse::<u64>()
                    .context("CHAT_SESSION_TTL_SECS must be a whole number of seconds")?,
                Err(_) => DEFAULT_CHAT_SESSION_TTL_SECS,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
