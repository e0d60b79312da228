//! SQLite connection bootstrap.
//!
//! Connections returned from here have a busy timeout set and every schema
//! migration applied. Nothing reads or writes patient data before that.

pub mod migrations;

use crate::constants::DB_BUSY_TIMEOUT_SECS;
use crate::{PatientError, PatientResult};
use migrations::apply_migrations;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file, creating parent directories as needed, and
/// applies all pending migrations.
pub fn open_db(path: &Path) -> PatientResult<Connection> {
    let started_at = Instant::now();
    tracing::info!(mode = "file", path = %path.display(), "opening database");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(PatientError::StorageDirCreation)?;
    }

    let conn = Connection::open(path).map_err(|err| {
        tracing::error!(mode = "file", error = %err, "failed to open database");
        PatientError::from(err)
    })?;

    bootstrap(conn, "file", started_at)
}

/// Opens a private in-memory database and applies all pending migrations.
pub fn open_db_in_memory() -> PatientResult<Connection> {
    let started_at = Instant::now();
    tracing::info!(mode = "memory", "opening database");

    let conn = Connection::open_in_memory()?;
    bootstrap(conn, "memory", started_at)
}

fn bootstrap(mut conn: Connection, mode: &str, started_at: Instant) -> PatientResult<Connection> {
    match configure(&mut conn) {
        Ok(()) => {
            tracing::info!(
                mode,
                duration_ms = started_at.elapsed().as_millis() as u64,
                "database ready"
            );
            Ok(conn)
        }
        Err(err) => {
            tracing::error!(
                mode,
                duration_ms = started_at.elapsed().as_millis() as u64,
                error = %err,
                "database bootstrap failed"
            );
            Err(err)
        }
    }
}

fn configure(conn: &mut Connection) -> PatientResult<()> {
    conn.busy_timeout(Duration::from_secs(DB_BUSY_TIMEOUT_SECS))?;
    apply_migrations(conn)
}
