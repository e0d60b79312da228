//! Translation of core failures into HTTP responses.
//!
//! Every failing handler returns [`ApiError`]; this is the only place that
//! knows which status code and envelope message each failure gets.

use api_shared::{ApiResponse, FieldErrors};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use patient_core::PatientError;

pub const MSG_VALIDATION: &str = "Validation error";
pub const MSG_INVALID_ID: &str = "Invalid patient id";
pub const MSG_DUPLICATE_EMAIL: &str = "Email address already exists";
pub const MSG_NOT_FOUND: &str = "Patient not found";
pub const MSG_INTERNAL: &str = "An unexpected error occurred";
pub const MSG_MALFORMED_BODY: &str = "Malformed request body";

/// A failed request, ready to be rendered as an error envelope.
#[derive(Debug)]
pub enum ApiError {
    /// Anything the core reported.
    Patient(PatientError),
    /// The body could not be read as a patient request.
    MalformedBody(JsonRejection),
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        Self::Patient(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection)
    }
}

impl ApiError {
    fn parts(self) -> (StatusCode, &'static str, Option<FieldErrors>) {
        match self {
            ApiError::MalformedBody(rejection) => {
                tracing::warn!(reason = %rejection.body_text(), "rejected malformed request body");
                (StatusCode::BAD_REQUEST, MSG_MALFORMED_BODY, None)
            }
            ApiError::Patient(PatientError::Validation(errors)) => {
                tracing::warn!(%errors, "request failed validation");
                (
                    StatusCode::BAD_REQUEST,
                    MSG_VALIDATION,
                    Some(FieldErrors(errors.into_map())),
                )
            }
            ApiError::Patient(err @ PatientError::InvalidIdentifier(_)) => {
                tracing::warn!(error = %err, "rejected malformed patient id");
                (StatusCode::BAD_REQUEST, MSG_INVALID_ID, None)
            }
            ApiError::Patient(err @ PatientError::DuplicateEmail(_)) => {
                tracing::warn!(error = %err, "rejected duplicate email");
                (StatusCode::CONFLICT, MSG_DUPLICATE_EMAIL, None)
            }
            ApiError::Patient(PatientError::NotFound(id)) => {
                tracing::warn!(patient_id = %id, "patient not found");
                (StatusCode::NOT_FOUND, MSG_NOT_FOUND, None)
            }
            ApiError::Patient(err) => {
                tracing::error!(error = ?err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL, None)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, data) = self.parts();
        let envelope = ApiResponse {
            status: status.as_u16(),
            message: message.to_string(),
            data,
        };
        (status, Json(envelope)).into_response()
    }
}
