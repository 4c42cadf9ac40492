use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::session::{SessionError, ANALYSIS_FAILED, MISSING_RESUMES};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Missing resumes: {0}")]
    MissingResumes(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Run {0} was superseded")]
    RunSuperseded(u64),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => AppError::NotFound(format!("Session {id} not found")),
            SessionError::Superseded(run) => AppError::RunSuperseded(run),
            SessionError::Analysis(e) if e.is_validation() => AppError::MissingResumes(e.to_string()),
            SessionError::Analysis(e) => AppError::AnalysisFailed(e.to_string()),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::Validation(format!("Malformed upload: {}", err.body_text()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::MissingResumes(msg) => {
                tracing::info!("Analysis rejected: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    "MISSING_RESUMES",
                    MISSING_RESUMES.message.to_string(),
                )
            }
            AppError::AnalysisFailed(cause) => {
                // The cause stays in the logs; users always see the same message.
                tracing::error!("Analysis failed: {cause}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ANALYSIS_FAILED",
                    format!("{}: {}", ANALYSIS_FAILED.title, ANALYSIS_FAILED.message),
                )
            }
            AppError::RunSuperseded(run) => (
                StatusCode::CONFLICT,
                "RUN_SUPERSEDED",
                format!("Run {run} was superseded by a newer run or edit"),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
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

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::orchestrator::AnalysisError;
    use crate::llm_client::LlmError;
    use crate::models::candidate::CandidateSlot;

    #[test]
    fn test_processing_failures_collapse_to_one_message() {
        let err: AppError = SessionError::Analysis(AnalysisError::Request(LlmError::MissingApiKey)).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_missing_resumes_is_bad_request() {
        let err: AppError =
            SessionError::Analysis(AnalysisError::MissingResumes(vec![CandidateSlot::Person1])).into();
        assert!(matches!(err, AppError::MissingResumes(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_superseded_is_conflict() {
        let err: AppError = SessionError::Superseded(4).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = AppError::PayloadTooLarge("limit exceeded".to_string());
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let err: AppError = SessionError::NotFound(uuid::Uuid::nil()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
