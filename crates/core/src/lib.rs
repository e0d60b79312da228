//! # Patient Core
//!
//! Core business logic for the patient records service.
//!
//! This crate contains pure data operations:
//! - Request validation into typed domain records
//! - The patient lifecycle (list, get, create, update, delete) and its
//!   uniqueness rules
//! - SQLite persistence behind the [`PatientStore`] trait
//!
//! **No API concerns**: HTTP servers, response envelopes and status codes
//! belong in `api-rest` or `api-shared`.

pub mod config;
pub mod constants;
pub mod db;
pub mod demographics;
pub mod error;
pub mod patient;
pub mod repositories;
pub mod validation;

pub use api_shared::{PatientReq, PatientRes};
pub use config::{database_location_from_env_value, CoreConfig, DatabaseLocation};
pub use demographics::{NewPatient, Patient, PatientChanges};
pub use error::{PatientError, PatientResult};
pub use patient::PatientService;
pub use patient_types::{EmailAddress, NonEmptyText};
pub use patient_uuid::PatientId;
pub use repositories::patients::{PatientStore, SqlitePatientStore};
pub use validation::{validate_create, validate_update, ValidationErrors};
