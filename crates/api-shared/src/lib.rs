//! # API Shared
//!
//! Wire types for the patient service APIs.
//!
//! Contains:
//! - Patient request/response DTOs
//! - The `{status, message, data}` response envelope
//! - Shared services like `HealthService`
//!
//! Used by `patient-core`, `api-rest` and the CLI so that every surface speaks
//! the same JSON shape.

pub mod envelope;
pub mod health;
pub mod patient;

pub use envelope::{ApiResponse, ErrorEnvelope, FieldErrors, PatientEnvelope, PatientListEnvelope};
pub use health::{HealthRes, HealthService};
pub use patient::{PatientReq, PatientRes};
