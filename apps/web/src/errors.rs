use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::form::registry::ApplyError;
use crate::resume::export::ExportError;
use crate::resume::store::StoreError;
use crate::submission::controller::{SubmitError, GENERIC_FAILURE};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Submission cancelled")]
    Cancelled,

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Generation timed out")]
    GenerationTimeout,

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ApplyError> for AppError {
    fn from(e: ApplyError) -> Self {
        match e {
            ApplyError::UnknownForm => AppError::NotFound("Form not found".to_string()),
            ApplyError::Rejected(e) => AppError::Validation(e.to_string()),
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::UnknownForm => AppError::NotFound("Form not found".to_string()),
            SubmitError::Busy => AppError::Conflict(e.to_string()),
            SubmitError::MissingFields(fields) => AppError::MissingFields(fields),
            SubmitError::Generation(_) | SubmitError::InvalidDocument(_) => {
                AppError::Generation(e.to_string())
            }
            SubmitError::Timeout(_) => AppError::GenerationTimeout,
            SubmitError::Cancelled => AppError::Cancelled,
            SubmitError::Task(e) => AppError::Internal(anyhow::anyhow!("generation task: {e}")),
            SubmitError::Store(e) => AppError::Store(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MissingFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) | AppError::Cancelled => StatusCode::CONFLICT,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::GenerationTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Export(_)
            | AppError::Store(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code and the message shown to the client. Server-side failures
    /// are logged here and reported with a generic message.
    fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::MissingFields(_) => (
                "MISSING_FIELDS",
                "Please fill in all required fields".to_string(),
            ),
            AppError::Conflict(msg) => ("CONFLICT", msg.clone()),
            AppError::Cancelled => (
                "SUBMISSION_CANCELLED",
                "The submission was cancelled".to_string(),
            ),
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                ("GENERATION_ERROR", GENERIC_FAILURE.to_string())
            }
            AppError::GenerationTimeout => {
                tracing::error!("Generation timed out");
                ("GENERATION_TIMEOUT", GENERIC_FAILURE.to_string())
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                ("EXPORT_ERROR", "Could not produce the PDF".to_string())
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                ("STORE_ERROR", "A storage error occurred".to_string())
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {e:?}");
                ("TEMPLATE_ERROR", "The page could not be rendered".to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = self.code_and_message();

        let body = match &self {
            AppError::MissingFields(fields) => json!({
                "error": {
                    "code": code,
                    "message": message,
                    "fields": fields,
                }
            }),
            _ => json!({
                "error": {
                    "code": code,
                    "message": message
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::models::ListName;
    use crate::form::store::FormError;
    use crate::submission::client::GenerationError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::MissingFields(vec!["skills".into()]),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Cancelled, StatusCode::CONFLICT),
            (AppError::Generation("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::GenerationTimeout, StatusCode::GATEWAY_TIMEOUT),
            (
                AppError::Export(ExportError::Pdf("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status);
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_rejected_action_is_validation_error() {
        let error: AppError = ApplyError::Rejected(FormError::LastEntry {
            list: ListName::Projects,
        })
        .into();
        assert!(matches!(error, AppError::Validation(msg) if msg.contains("projects")));
    }

    #[test]
    fn test_generation_failures_map_to_bad_gateway() {
        let error: AppError = SubmitError::Generation(GenerationError::Status {
            status: 500,
            message: "boom".into(),
        })
        .into();
        assert!(matches!(error, AppError::Generation(_)));

        let error: AppError = SubmitError::Busy.into();
        assert!(matches!(error, AppError::Conflict(_)));
    }
}
