//! Patient request body extractor.
//!
//! The body is parsed twice from the same bytes: once into [`PatientPayload`] for validation and
//! once into a raw JSON object that is echoed back unchanged on success.

use crate::error::ApiError;
use api_shared::PatientPayload;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};

#[derive(Debug)]
pub struct PatientBody {
    pub payload: PatientPayload,
    pub submitted: Map<String, Value>,
}

impl PatientBody {
    /// Parses a request body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MalformedBody` if the bytes are not a JSON object or a known field has
    /// the wrong type.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ApiError> {
        let submitted: Map<String, Value> = serde_json::from_slice(bytes).map_err(malformed)?;
        let payload: PatientPayload = serde_json::from_slice(bytes).map_err(malformed)?;
        Ok(Self { payload, submitted })
    }
}

fn malformed(err: serde_json::Error) -> ApiError {
    tracing::debug!(error = %err, "rejected patient payload");
    ApiError::MalformedBody(err.to_string())
}

#[async_trait]
impl<S> FromRequest<S> for PatientBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::MalformedBody(e.body_text()))?;
        Self::from_slice(&bytes)
    }
}
