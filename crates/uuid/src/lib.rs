//! Patient identifier utilities.
//!
//! Every patient record is keyed by a UUID v4 allocated at creation. To keep
//! lookups and stored keys consistent, the service uses a single *canonical*
//! textual form for identifiers: the **lowercase hyphenated** representation.
//!
//! ## Canonical form
//! - Length: 36
//! - Layout: `8-4-4-4-12` groups of `0-9` / `a-f`
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! Notes:
//! - This is the value you get from `Uuid::new_v4().hyphenated().to_string()`.
//! - Externally supplied identifiers (URL path segments, CLI arguments) must be
//!   canonical. Use [`PatientId::parse`] to validate them.
//! - Non-canonical values (uppercase, simple/braced/urn forms, wrong length,
//!   non-hex) are rejected rather than normalised.

mod id;

pub use id::PatientId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
