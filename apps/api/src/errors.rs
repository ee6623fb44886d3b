use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::scoring::ScoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// The body is always `{"error": "<message>"}`; a score is never sent alongside it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Extraction(e @ ExtractionError::UnsupportedFormat(_)) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
            }
            AppError::Extraction(e @ ExtractionError::Malformed { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            AppError::Extraction(e @ ExtractionError::Io(_)) => {
                tracing::error!("Document read error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Scoring(e @ ScoringError::MissingInput(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Scoring(e @ ScoringError::RetryExhausted { .. }) => {
                tracing::error!("{e}");
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            AppError::Scoring(e @ ScoringError::Model(_)) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(ExtractionError::UnsupportedFormat(".txt".into()).into()),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_of(
                ExtractionError::Malformed {
                    format: "PDF",
                    reason: "bad xref".into()
                }
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ScoringError::MissingInput("resume").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ScoringError::RetryExhausted { attempts: 5 }.into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::Validation("both".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_body_is_flat_error_message() {
        let response = AppError::from(ExtractionError::UnsupportedFormat(".txt".into())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(message.contains(".txt"));
        assert!(body.get("atsScore").is_none());
    }
}
