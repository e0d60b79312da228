//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_DATABASE_PATH, IN_MEMORY_DATABASE};
use crate::{PatientError, PatientResult};
use std::path::PathBuf;

/// Where the patient database lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A SQLite file; parent directories are created on open.
    File(PathBuf),
    /// A private in-memory database, discarded when the process exits.
    InMemory,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database: DatabaseLocation,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` if a file location points at an
    /// existing directory.
    pub fn new(database: DatabaseLocation) -> PatientResult<Self> {
        if let DatabaseLocation::File(path) = &database {
            if path.is_dir() {
                return Err(PatientError::InvalidInput(format!(
                    "database path is a directory: {}",
                    path.display()
                )));
            }
        }

        Ok(Self { database })
    }

    pub fn database(&self) -> &DatabaseLocation {
        &self.database
    }
}

/// Parse the database location from an optional string value.
///
/// `None` or an empty/whitespace value selects [`DEFAULT_DATABASE_PATH`];
/// the literal `:memory:` selects an in-memory database.
pub fn database_location_from_env_value(value: Option<String>) -> DatabaseLocation {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        Some(IN_MEMORY_DATABASE) => DatabaseLocation::InMemory,
        Some(path) => DatabaseLocation::File(PathBuf::from(path)),
        None => DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE_PATH)),
    }
}
