//! The fixed response envelope applied to every patient endpoint.

use crate::PatientRes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// `{status, message, data}` wrapper.
///
/// All three fields are always serialised. `status` mirrors the HTTP status
/// code of the response and `data` is `null` when there is no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[aliases(
    PatientEnvelope = ApiResponse<PatientRes>,
    PatientListEnvelope = ApiResponse<Vec<PatientRes>>,
    ErrorEnvelope = ApiResponse<FieldErrors>
)]
pub struct ApiResponse<T> {
    #[schema(example = 200)]
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Envelope with `data: null`.
    pub fn without_data(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
        }
    }
}

/// Field name to violation message, as returned for validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(pub BTreeMap<String, String>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_data_serialises_null_data() {
        let envelope: ApiResponse<PatientRes> =
            ApiResponse::without_data(404, "Patient not found");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["status"], 404);
        assert_eq!(value["message"], "Patient not found");
        assert!(value["data"].is_null());
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn field_errors_serialise_as_plain_map() {
        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), "Email should be valid".to_string());
        errors.insert("name".to_string(), "Name is required".to_string());

        let envelope = ApiResponse::new(400, "Validation error", FieldErrors(errors));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["data"]["email"], "Email should be valid");
        assert_eq!(value["data"]["name"], "Name is required");
    }
}
