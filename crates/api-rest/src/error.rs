//! API error type and its HTTP mapping.
//!
//! This is the only place status codes for failures are chosen.

use api_shared::{ErrorRes, MessageRes};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use patients_core::{PatientError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Payload or path failed a structural rule. 400 with `{message}`.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Body could not be read as a patient payload. 400 with `{message, error}`.
    #[error("Malformed patient payload: {0}")]
    MalformedBody(String),
    /// Persistence failed. 500 with `{message, error}`.
    #[error("{message}: {error}")]
    Storage { message: String, error: String },
}

impl ApiError {
    /// Maps a core error, using `message` as the fixed description for non-validation failures.
    pub fn from_patient_error(err: PatientError, message: impl Into<String>) -> Self {
        match err {
            PatientError::Validation(e) => ApiError::Validation(e),
            other => ApiError::Storage {
                message: message.into(),
                error: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                Json(MessageRes {
                    message: e.to_string(),
                }),
            )
                .into_response(),
            ApiError::MalformedBody(error) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorRes {
                    message: "Malformed patient payload".into(),
                    error,
                }),
            )
                .into_response(),
            ApiError::Storage { message, error } => {
                tracing::error!(%message, %error, "patient storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorRes { message, error }),
                )
                    .into_response()
            }
        }
    }
}
