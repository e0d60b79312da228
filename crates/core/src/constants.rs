//! Constants used throughout the patient core crate.

/// Maximum length of a patient name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Database file used when no explicit location is configured.
pub const DEFAULT_DATABASE_PATH: &str = "patient_data/patients.db";

/// Database location value that selects a transient in-memory database.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:4000";

/// How long a connection waits on a locked database before giving up.
pub const DB_BUSY_TIMEOUT_SECS: u64 = 5;
