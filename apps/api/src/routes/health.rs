use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "portfolio-api"
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::routes::build_router;
    use crate::state::AppState;

    fn test_state(llm: ScriptedGenerator) -> AppState {
        let config = Config {
            database_url: "postgres://localhost/portfolio_test".into(),
            redis_url: "redis://127.0.0.1/".into(),
            groq_api_key: "test".into(),
            port: 0,
            rust_log: "debug".into(),
            chat_session_ttl_secs: 60,
        };
        AppState {
            db: PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            redis: redis::Client::open(config.redis_url.as_str()).unwrap(),
            llm: Arc::new(llm),
            config,
        }
    }

    #[tokio::test]
    async fn test_health_route_reports_ok() {
        let response = build_router(test_state(ScriptedGenerator::new()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_blank_job_description_is_rejected_before_generation() {
        let response = build_router(test_state(ScriptedGenerator::new()))
            .oneshot(
                Request::post("/api/career/analyze-job")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"job_description": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_cover_letter_route_returns_generated_text() {
        let llm = ScriptedGenerator::new().reply("Dear Hiring Manager,\n\nI build APIs.");
        let response = build_router(test_state(llm))
            .oneshot(
                Request::post("/api/career/cover-letter")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"resume_text": "Rust dev", "job_description": "Backend role"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["cover_letter"], "Dear Hiring Manager,\n\nI build APIs.");
    }

    #[tokio::test]
    async fn test_unreachable_generator_maps_to_bad_gateway() {
        let llm = ScriptedGenerator::new().fail(503);
        let response = build_router(test_state(llm))
            .oneshot(
                Request::post("/api/career/career-guide")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"resume_text": "Rust dev", "job_description": "Backend role"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
