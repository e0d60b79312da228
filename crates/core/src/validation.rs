//! Request validation.
//!
//! Turns a raw [`PatientReq`] into validated domain values before anything
//! touches storage. Every field is checked and every violation is collected;
//! a request with several bad fields gets one error listing all of them.

use crate::constants::MAX_NAME_CHARS;
use crate::demographics::{NewPatient, PatientChanges};
use crate::{PatientError, PatientResult};
use api_shared::PatientReq;
use chrono::NaiveDate;
use patient_types::{EmailAddress, NonEmptyText, TextError};
use std::collections::BTreeMap;
use std::fmt;

pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_DATE_OF_BIRTH: &str = "dateOfBirth";
pub const FIELD_REGISTERED_DATE: &str = "registeredDate";

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Field name to message for every violation found on a request.
///
/// Keys are the wire (camelCase) field names. At most one message is kept per
/// field: the first rule that failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation unless the field already has one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }

    /// Unwraps a field result, recording its message on failure.
    fn check<T>(&mut self, field: &str, result: Result<T, &'static str>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validates a create request. `registeredDate` is required.
///
/// # Errors
///
/// Returns `PatientError::Validation` carrying every violated field.
pub fn validate_create(req: &PatientReq) -> PatientResult<NewPatient> {
    let mut errors = ValidationErrors::new();

    let name = errors.check(FIELD_NAME, parse_name(req.name.as_deref()));
    let email = errors.check(FIELD_EMAIL, parse_email(req.email.as_deref()));
    let address = errors.check(FIELD_ADDRESS, parse_address(req.address.as_deref()));
    let date_of_birth = errors.check(
        FIELD_DATE_OF_BIRTH,
        parse_date_of_birth(req.date_of_birth.as_deref()),
    );
    let registered_date = errors.check(
        FIELD_REGISTERED_DATE,
        parse_required_registered_date(req.registered_date.as_deref()),
    );

    match (name, email, address, date_of_birth, registered_date) {
        (Some(name), Some(email), Some(address), Some(date_of_birth), Some(registered_date))
            if errors.is_empty() =>
        {
            Ok(NewPatient {
                name,
                email,
                address,
                date_of_birth,
                registered_date,
            })
        }
        _ => Err(PatientError::Validation(errors)),
    }
}

/// Validates an update request. `registeredDate` may be omitted; when
/// present it must still be a valid date.
///
/// # Errors
///
/// Returns `PatientError::Validation` carrying every violated field.
pub fn validate_update(req: &PatientReq) -> PatientResult<PatientChanges> {
    let mut errors = ValidationErrors::new();

    let name = errors.check(FIELD_NAME, parse_name(req.name.as_deref()));
    let email = errors.check(FIELD_EMAIL, parse_email(req.email.as_deref()));
    let address = errors.check(FIELD_ADDRESS, parse_address(req.address.as_deref()));
    let date_of_birth = errors.check(
        FIELD_DATE_OF_BIRTH,
        parse_date_of_birth(req.date_of_birth.as_deref()),
    );
    let registered_date = errors.check(
        FIELD_REGISTERED_DATE,
        parse_optional_registered_date(req.registered_date.as_deref()),
    );

    match (name, email, address, date_of_birth, registered_date) {
        (Some(name), Some(email), Some(address), Some(date_of_birth), Some(registered_date))
            if errors.is_empty() =>
        {
            Ok(PatientChanges {
                name,
                email,
                address,
                date_of_birth,
                registered_date,
            })
        }
        _ => Err(PatientError::Validation(errors)),
    }
}

fn parse_name(value: Option<&str>) -> Result<NonEmptyText, &'static str> {
    NonEmptyText::with_max_chars(value.unwrap_or_default(), MAX_NAME_CHARS).map_err(|e| match e {
        TextError::Empty => "Name is required",
        TextError::TooLong { .. } => "Name cannot exceed 100 characters",
    })
}

fn parse_email(value: Option<&str>) -> Result<EmailAddress, &'static str> {
    EmailAddress::parse(value.unwrap_or_default()).map_err(|e| match e {
        patient_types::EmailError::Empty => "Email is required",
        patient_types::EmailError::Invalid(_) => "Email should be valid",
    })
}

fn parse_address(value: Option<&str>) -> Result<NonEmptyText, &'static str> {
    NonEmptyText::new(value.unwrap_or_default()).map_err(|_| "Address is required")
}

fn parse_date_of_birth(value: Option<&str>) -> Result<NaiveDate, &'static str> {
    match non_blank(value) {
        None => Err("Date of birth is required"),
        Some(raw) => {
            parse_iso_date(raw).ok_or("Date of birth must be a valid date (YYYY-MM-DD)")
        }
    }
}

fn parse_required_registered_date(value: Option<&str>) -> Result<NaiveDate, &'static str> {
    parse_optional_registered_date(value)?.ok_or("Registered date is required")
}

fn parse_optional_registered_date(value: Option<&str>) -> Result<Option<NaiveDate>, &'static str> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => parse_iso_date(raw)
            .map(Some)
            .ok_or("Registered date must be a valid date (YYYY-MM-DD)"),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts only the zero-padded `YYYY-MM-DD` form. chrono alone would also
/// take `1990-1-1` or `+1990-01-01`.
fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT)
        .ok()
        .filter(|date| date.format(ISO_DATE_FORMAT).to_string() == raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice_req() -> PatientReq {
        PatientReq {
            name: Some("Alice".into()),
            email: Some("a@x.com".into()),
            address: Some("1 Main St".into()),
            date_of_birth: Some("1990-01-01".into()),
            registered_date: Some("2024-01-01".into()),
        }
    }

    fn validation_errors(err: PatientError) -> ValidationErrors {
        match err {
            PatientError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_accepts_valid_request() {
        let new_patient = validate_create(&alice_req()).expect("valid request");

        assert_eq!(new_patient.name.as_str(), "Alice");
        assert_eq!(new_patient.email.as_str(), "a@x.com");
        assert_eq!(new_patient.address.as_str(), "1 Main St");
        assert_eq!(new_patient.date_of_birth.to_string(), "1990-01-01");
        assert_eq!(new_patient.registered_date.to_string(), "2024-01-01");
    }

    #[test]
    fn create_collects_every_violation() {
        let err = validate_create(&PatientReq::default()).unwrap_err();
        let errors = validation_errors(err);

        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(FIELD_NAME), Some("Name is required"));
        assert_eq!(errors.get(FIELD_EMAIL), Some("Email is required"));
        assert_eq!(errors.get(FIELD_ADDRESS), Some("Address is required"));
        assert_eq!(
            errors.get(FIELD_DATE_OF_BIRTH),
            Some("Date of birth is required")
        );
        assert_eq!(
            errors.get(FIELD_REGISTERED_DATE),
            Some("Registered date is required")
        );
    }

    #[test]
    fn create_reports_format_problems_per_field() {
        let req = PatientReq {
            name: Some("x".repeat(101)),
            email: Some("not-an-email".into()),
            address: Some("   ".into()),
            date_of_birth: Some("1990-02-30".into()),
            registered_date: Some("yesterday".into()),
        };
        let errors = validation_errors(validate_create(&req).unwrap_err());

        assert_eq!(errors.get(FIELD_NAME), Some("Name cannot exceed 100 characters"));
        assert_eq!(errors.get(FIELD_EMAIL), Some("Email should be valid"));
        assert_eq!(errors.get(FIELD_ADDRESS), Some("Address is required"));
        assert_eq!(
            errors.get(FIELD_DATE_OF_BIRTH),
            Some("Date of birth must be a valid date (YYYY-MM-DD)")
        );
        assert_eq!(
            errors.get(FIELD_REGISTERED_DATE),
            Some("Registered date must be a valid date (YYYY-MM-DD)")
        );
    }

    #[test]
    fn dates_must_be_zero_padded_iso() {
        for raw in ["1990-1-1", "+1990-01-01", "1990-01-1", "01990-01-01", "1990-01-01T00:00"] {
            let req = PatientReq {
                date_of_birth: Some(raw.into()),
                registered_date: Some(raw.into()),
                ..alice_req()
            };
            let errors = validation_errors(validate_create(&req).unwrap_err());

            assert_eq!(
                errors.get(FIELD_DATE_OF_BIRTH),
                Some("Date of birth must be a valid date (YYYY-MM-DD)"),
                "dateOfBirth {raw}"
            );
            assert_eq!(
                errors.get(FIELD_REGISTERED_DATE),
                Some("Registered date must be a valid date (YYYY-MM-DD)"),
                "registeredDate {raw}"
            );
        }
    }

    #[test]
    fn update_rejects_unpadded_registered_date() {
        let req = PatientReq {
            registered_date: Some("2024-2-9".into()),
            ..alice_req()
        };
        let errors = validation_errors(validate_update(&req).unwrap_err());

        assert_eq!(
            errors.get(FIELD_REGISTERED_DATE),
            Some("Registered date must be a valid date (YYYY-MM-DD)")
        );
    }

    #[test]
    fn name_of_exactly_max_length_is_accepted() {
        let req = PatientReq {
            name: Some("n".repeat(MAX_NAME_CHARS)),
            ..alice_req()
        };
        assert!(validate_create(&req).is_ok());
    }

    #[test]
    fn single_bad_field_reports_only_that_field() {
        let req = PatientReq {
            email: Some("a@".into()),
            ..alice_req()
        };
        let errors = validation_errors(validate_create(&req).unwrap_err());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FIELD_EMAIL), Some("Email should be valid"));
    }

    #[test]
    fn update_allows_missing_registered_date() {
        let req = PatientReq {
            registered_date: None,
            ..alice_req()
        };
        let changes = validate_update(&req).expect("registered date is optional on update");

        assert_eq!(changes.registered_date, None);
    }

    #[test]
    fn update_still_rejects_malformed_registered_date() {
        let req = PatientReq {
            registered_date: Some("2024-13-01".into()),
            ..alice_req()
        };
        let errors = validation_errors(validate_update(&req).unwrap_err());

        assert_eq!(errors.len(), 1);
        assert!(errors.get(FIELD_REGISTERED_DATE).is_some());
    }

    #[test]
    fn update_requires_other_fields() {
        let req = PatientReq {
            name: None,
            date_of_birth: Some(" ".into()),
            ..alice_req()
        };
        let errors = validation_errors(validate_update(&req).unwrap_err());

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(FIELD_NAME), Some("Name is required"));
        assert_eq!(
            errors.get(FIELD_DATE_OF_BIRTH),
            Some("Date of birth is required")
        );
    }

    #[test]
    fn display_lists_fields_in_order() {
        let mut errors = ValidationErrors::new();
        errors.add(FIELD_NAME, "Name is required");
        errors.add(FIELD_EMAIL, "Email is required");
        errors.add(FIELD_EMAIL, "ignored second message");

        assert_eq!(
            errors.to_string(),
            "email: Email is required; name: Name is required"
        );
    }
}
