use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::classifier::ClassifierError;
use crate::models::QuoteResponse;

/// Reason string returned to callers for every failed prediction.
pub const INTERNAL_ERROR_REASON: &str = "Internal Error";

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Input failed a structural check (e.g. height code is not 3 digits).
    Validation(String),
    /// Input could not be parsed as a number.
    Parse(String),
    /// Input value has no entry in a fixed mapping (e.g. unknown gender).
    Lookup(String),
    /// The classifier failed or returned an unusable category.
    Classifier(ClassifierError),
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AppError::Lookup(msg) => write!(f, "Lookup error: {}", msg),
            AppError::Classifier(e) => write!(f, "Classifier error: {}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Classifier(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Every variant collapses into the same `{"quote": null, "reason": "Internal Error"}`
    /// payload with HTTP 200; callers never see which step failed. The cause is
    /// logged here, at a level matching its severity.
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(_) | AppError::Parse(_) | AppError::Lookup(_) => {
                tracing::warn!("Rejected applicant: {}", self);
            }
            AppError::Classifier(_) | AppError::Internal(_) => {
                tracing::error!("Prediction failed: {}", self);
            }
        }

        (
            StatusCode::OK,
            Json(QuoteResponse::failure(INTERNAL_ERROR_REASON)),
        )
            .into_response()
    }
}

impl From<ClassifierError> for AppError {
    /// Converts a `ClassifierError` into an `AppError`.
    fn from(err: ClassifierError) -> Self {
        AppError::Classifier(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_variant_renders_generic_payload() {
        let errors = vec![
            AppError::Validation("ht".to_string()),
            AppError::Parse("wt".to_string()),
            AppError::Lookup("gender".to_string()),
            AppError::Classifier(ClassifierError::InvalidModel("broken".to_string())),
            AppError::Internal("boom".to_string()),
        ];

        for err in errors {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::OK);

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(
                json,
                serde_json::json!({"quote": null, "reason": "Internal Error"})
            );
        }
    }

    #[test]
    fn test_display_includes_cause() {
        let err = AppError::Lookup("unknown gender 'Other'".to_string());
        assert_eq!(err.to_string(), "Lookup error: unknown gender 'Other'");
    }
}
