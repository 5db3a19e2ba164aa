use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::guard::ValidationError;
use crate::llm_client::LlmError;
use crate::ratelimit::RateLimitError;
use crate::render::RenderError;
use crate::tailoring::response::ResponseError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Truth-lock violation: {0}")]
    TruthLock(#[from] ValidationError),

    #[error("Oracle response error: {0}")]
    Response(#[from] ResponseError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Rate limited")]
    RateLimited { retry_after_secs: u64 },

    #[error("Rate limiter error: {0}")]
    RateLimiter(#[from] RateLimitError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::TruthLock(e) => e.kind(),
            AppError::Response(e) => e.kind(),
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::RateLimited { .. } => "RATE_LIMITED",
            AppError::RateLimiter(_) => "RATE_LIMITER_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::TruthLock(e) => {
                tracing::warn!(kind = e.kind(), "truth-lock violation: {e}");
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            AppError::Response(e) => {
                tracing::warn!(kind = e.kind(), "unusable oracle response: {e}");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "The rewrite service is unavailable".to_string(),
                )
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The document could not be rendered".to_string(),
                )
            }
            AppError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                format!("Too many requests; try again in {retry_after_secs} seconds"),
            ),
            AppError::RateLimiter(e) => {
                tracing::error!("Rate limiter error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Rate limiting is unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        match self {
            AppError::RateLimited { retry_after_secs } => (
                status,
                [(axum::http::header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_truth_lock_maps_to_422_with_kind() {
        let err = AppError::from(ValidationError::FabricatedCertification("PMP".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "FABRICATED_CERTIFICATION");
        assert!(body["error"]["message"].as_str().unwrap().contains("PMP"));
    }

    #[tokio::test]
    async fn test_response_errors_map_to_502() {
        let response = AppError::from(ResponseError::Truncated).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"]["code"], "TRUNCATED_RESPONSE");
    }

    #[tokio::test]
    async fn test_rate_limited_sets_retry_after() {
        let response = AppError::RateLimited {
            retry_after_secs: 60,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "60");
    }
}
