//! `/patient` handlers.
//!
//! Handlers only unwrap the request, call [`PatientService`] and wrap the
//! result in an envelope. Failures go through [`ApiError`].
//!
//! [`PatientService`]: patient_core::PatientService

use crate::error::ApiError;
use crate::AppState;
use api_shared::{ApiResponse, ErrorEnvelope, PatientEnvelope, PatientListEnvelope};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use patient_core::{PatientReq, PatientRes};

type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn envelope<T>(status: StatusCode, message: &str, data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (status, Json(ApiResponse::new(status.as_u16(), message, data)))
}

#[utoipa::path(
    get,
    path = "/patient",
    responses(
        (status = 200, description = "All patients", body = PatientListEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
/// List every patient
#[axum::debug_handler]
pub async fn list_patients(State(state): State<AppState>) -> ApiResult<Vec<PatientRes>> {
    let patients = state.patient_service.list()?;
    let data = patients.into_iter().map(PatientRes::from).collect();
    Ok(envelope(StatusCode::OK, "Patients fetched successfully", data))
}

#[utoipa::path(
    get,
    path = "/patient/{id}",
    params(("id" = String, Path, description = "Patient UUID")),
    responses(
        (status = 200, description = "The patient", body = PatientEnvelope),
        (status = 400, description = "Malformed patient id", body = ErrorEnvelope),
        (status = 404, description = "No such patient", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
/// Fetch one patient by id
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PatientRes> {
    let patient = state.patient_service.get(&id)?;
    Ok(envelope(StatusCode::OK, "Patient fetched successfully", patient.into()))
}

#[utoipa::path(
    post,
    path = "/patient",
    request_body = PatientReq,
    responses(
        (status = 201, description = "Patient created", body = PatientEnvelope),
        (status = 400, description = "Validation error or malformed body", body = ErrorEnvelope),
        (status = 409, description = "Email address already exists", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
/// Create a patient
///
/// The server assigns the id. `data` on a 400 maps each invalid field to its
/// message.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientReq>, JsonRejection>,
) -> ApiResult<PatientRes> {
    let Json(req) = payload?;
    let patient = state.patient_service.create(&req)?;
    Ok(envelope(StatusCode::CREATED, "Patient created successfully", patient.into()))
}

#[utoipa::path(
    put,
    path = "/patient/{id}",
    params(("id" = String, Path, description = "Patient UUID")),
    request_body = PatientReq,
    responses(
        (status = 200, description = "Patient updated", body = PatientEnvelope),
        (status = 400, description = "Validation error, malformed body or malformed id", body = ErrorEnvelope),
        (status = 404, description = "No such patient", body = ErrorEnvelope),
        (status = 409, description = "Email address already exists", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
/// Replace a patient's fields
///
/// Omitting `registeredDate` keeps the stored value.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PatientReq>, JsonRejection>,
) -> ApiResult<PatientRes> {
    let Json(req) = payload?;
    let patient = state.patient_service.update(&id, &req)?;
    Ok(envelope(StatusCode::OK, "Patient updated successfully", patient.into()))
}

#[utoipa::path(
    delete,
    path = "/patient/{id}",
    params(("id" = String, Path, description = "Patient UUID")),
    responses(
        (status = 200, description = "Patient deleted, `data` is null"),
        (status = 400, description = "Malformed patient id", body = ErrorEnvelope),
        (status = 404, description = "No such patient", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
/// Delete a patient
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.patient_service.delete(&id)?;
    Ok(Json(ApiResponse::without_data(
        StatusCode::OK.as_u16(),
        "Patient deleted successfully",
    )))
}
