use crate::validation::ValidationErrors;
use patient_uuid::{PatientId, UuidError};

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("invalid patient id: {0}")]
    InvalidIdentifier(#[source] UuidError),
    #[error("email address already exists: {0}")]
    DuplicateEmail(String),
    #[error("patient not found: {0}")]
    NotFound(PatientId),

    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create database directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error(
        "database schema version {db_version} is newer than supported {latest_supported}"
    )]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("invalid persisted patient data: {0}")]
    InvalidPersistedData(String),
    #[error("patient store lock poisoned")]
    StoreLockPoisoned,
}

impl PatientError {
    /// True for errors caused by the request rather than by the service.
    ///
    /// Domain errors fail only the request that triggered them; everything
    /// else is an internal fault.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidIdentifier(_)
                | Self::DuplicateEmail(_)
                | Self::NotFound(_)
        )
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
