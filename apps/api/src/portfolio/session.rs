//! Redis persistence for in-progress chat sessions.
//! Sessions are stored as JSON under `chat_session:<portfolio_id>` with a TTL.

use anyhow::Context;
use redis::{AsyncCommands, Client as RedisClient};
use uuid::Uuid;

use crate::errors::AppError;
use crate::parsing::chat::ChatSession;

const KEY_PREFIX: &str = "chat_session:";

pub fn session_key(portfolio_id: Uuid) -> String {
    format!("{KEY_PREFIX}{portfolio_id}")
}

/// Stores the session, resetting its TTL.
pub async fn save_session(
    redis: &RedisClient,
    session: &ChatSession,
    ttl_secs: u64,
) -> Result<(), AppError> {
    let payload = serde_json::to_string(session).context("Failed to serialize chat session")?;
    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.set_ex::<_, _, ()>(session_key(session.portfolio_id), payload, ttl_secs)
        .await?;
    Ok(())
}

/// Loads a session. Expired or unknown sessions are `None`.
pub async fn load_session(
    redis: &RedisClient,
    portfolio_id: Uuid,
) -> Result<Option<ChatSession>, AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let payload: Option<String> = conn.get(session_key(portfolio_id)).await?;

    payload
        .map(|json| {
            serde_json::from_str::<ChatSession>(&json)
                .with_context(|| format!("Corrupt chat session for portfolio {portfolio_id}"))
        })
        .transpose()
        .map_err(AppError::from)
}

pub async fn delete_session(redis: &RedisClient, portfolio_id: Uuid) -> Result<(), AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.del::<_, ()>(session_key(portfolio_id)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_format() {
        let id = Uuid::nil();
        assert_eq!(
            session_key(id),
            "chat_session:00000000-0000-0000-0000-000000000000"
        );
    }
}
