//! Patient collection and resource handlers.

use crate::body::PatientBody;
use crate::error::ApiError;
use crate::router::AppState;
use api_shared::{MessageRes, PatientEchoRes, PatientRow};
use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
};
use patients_core::PatientId;

const DATABASE_ERROR: &str = "Database error";

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "Every stored patient, JSON columns still encoded",
            body = [PatientRow]),
        (status = 500, description = "Database error", body = api_shared::ErrorRes)
    )
)]
/// List all patients in the system
///
/// Rows come back in id order with `addresses`, `phone_numbers` and `additional_fields` as the
/// JSON text they are stored as.
///
/// # Errors
/// Returns `500 Internal Server Error` if the read fails.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientRow>>, ApiError> {
    let patients = state
        .patient_service
        .list_patients()
        .await
        .map_err(|e| ApiError::from_patient_error(e, DATABASE_ERROR))?;
    Ok(Json(patients))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = api_shared::PatientPayload,
    responses(
        (status = 201, description = "Patient created; the submitted object is echoed with its id",
            body = PatientEchoRes),
        (status = 400, description = "Validation failed or body malformed", body = MessageRes),
        (status = 500, description = "Database error", body = api_shared::ErrorRes)
    )
)]
/// Create a new patient record
///
/// # Errors
/// Returns `400 Bad Request` if the body is malformed or fails validation, and
/// `500 Internal Server Error` if the insert fails.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    body: PatientBody,
) -> Result<(StatusCode, Json<PatientEchoRes>), ApiError> {
    let id = state
        .patient_service
        .create_patient(&body.payload)
        .await
        .map_err(|e| ApiError::from_patient_error(e, DATABASE_ERROR))?;

    Ok((
        StatusCode::CREATED,
        Json(PatientEchoRes::new(id.get(), body.submitted)),
    ))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    request_body = api_shared::PatientPayload,
    responses(
        (status = 200, description = "Patient replaced; the submitted object is echoed with its id",
            body = PatientEchoRes),
        (status = 400, description = "Invalid id, validation failed or body malformed",
            body = MessageRes),
        (status = 500, description = "Update failed", body = api_shared::ErrorRes)
    )
)]
/// Replace every mutable field of a patient
///
/// Addresses and additional fields are replaced wholesale, not merged. The id is checked before
/// the body.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
    body: Result<PatientBody, ApiError>,
) -> Result<Json<PatientEchoRes>, ApiError> {
    let id = PatientId::parse(&raw_id)?;
    let body = body?;

    state
        .patient_service
        .update_patient(id, &body.payload)
        .await
        .map_err(|e| {
            ApiError::from_patient_error(e, format!("Unable to update patient with id {id}"))
        })?;

    Ok(Json(PatientEchoRes::new(id.get(), body.submitted)))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 400, description = "Invalid id", body = MessageRes),
        (status = 500, description = "Delete failed", body = api_shared::ErrorRes)
    )
)]
/// Hard-delete a patient
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
) -> Result<Json<MessageRes>, ApiError> {
    let id = PatientId::parse(&raw_id)?;

    state
        .patient_service
        .delete_patient(id)
        .await
        .map_err(|e| {
            ApiError::from_patient_error(e, format!("Unable to delete patient with id {id}"))
        })?;

    Ok(Json(MessageRes {
        message: format!("Deleted patient with id {id}"),
    }))
}
