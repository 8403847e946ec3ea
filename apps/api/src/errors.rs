use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::curation::orchestrator::CurationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Curation failed: {0}")]
    CurationFailed(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<CurationError> for AppError {
    fn from(err: CurationError) -> Self {
        match err {
            CurationError::CatalogUnavailable => AppError::ServiceUnavailable(err.to_string()),
            CurationError::Internal(msg) => AppError::CurationFailed(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::CurationFailed(msg) => {
                tracing::error!("Curation failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CURATION_FAILED",
                    format!("Curation failed: {msg}"),
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

    #[test]
    fn test_curation_error_mapping() {
        let unavailable = AppError::from(CurationError::CatalogUnavailable);
        assert_eq!(
            unavailable.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let failed = AppError::from(CurationError::Internal("scoring task panicked".into()));
        assert!(matches!(&failed, AppError::CurationFailed(m) if m == "scoring task panicked"));
        assert_eq!(
            failed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_is_bad_request() {
        let response = AppError::Validation("maxProducts out of range".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
