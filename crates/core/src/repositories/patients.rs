//! Patient store contract and SQLite implementation.
//!
//! ## Storage
//!
//! One `patients` table keyed by the canonical identifier string. Dates are
//! ISO text. The `email` column is `COLLATE NOCASE` and carries a unique
//! index, so existence checks and the constraint agree on what counts as the
//! same address.
//!
//! ## Uniqueness
//!
//! A unique-constraint violation on write is reported as
//! [`PatientError::DuplicateEmail`], the same error the lifecycle manager
//! raises from its own pre-check. Two writers racing on one address therefore
//! see one success and one duplicate, never two rows.

use crate::config::{CoreConfig, DatabaseLocation};
use crate::db::{open_db, open_db_in_memory};
use crate::demographics::Patient;
use crate::{PatientError, PatientResult};
use chrono::NaiveDate;
use patient_types::{EmailAddress, NonEmptyText};
use patient_uuid::PatientId;
use rusqlite::{params, Connection, Row};
use std::sync::{Mutex, MutexGuard};

const PATIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    address,
    date_of_birth,
    registered_date
FROM patients";

/// Storage operations the lifecycle manager relies on.
///
/// Each call is atomic with respect to itself; no transaction spans calls.
pub trait PatientStore: Send + Sync {
    /// Every patient, in insertion order.
    fn list_all(&self) -> PatientResult<Vec<Patient>>;
    fn find_by_id(&self, id: &PatientId) -> PatientResult<Option<Patient>>;
    fn exists_by_id(&self, id: &PatientId) -> PatientResult<bool>;
    fn exists_by_email(&self, email: &EmailAddress) -> PatientResult<bool>;
    /// True if a patient other than `id` already uses `email`.
    fn exists_by_email_excluding_id(
        &self,
        email: &EmailAddress,
        id: &PatientId,
    ) -> PatientResult<bool>;
    fn insert(&self, patient: &Patient) -> PatientResult<Patient>;
    /// Overwrites the stored record with the same id.
    fn update(&self, patient: &Patient) -> PatientResult<Patient>;
    fn delete_by_id(&self, id: &PatientId) -> PatientResult<()>;
}

/// SQLite-backed patient store.
///
/// The connection is serialised behind a mutex so the store can be shared
/// across request handlers.
pub struct SqlitePatientStore {
    conn: Mutex<Connection>,
}

impl SqlitePatientStore {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens the database described by `cfg`.
    pub fn open(cfg: &CoreConfig) -> PatientResult<Self> {
        let conn = match cfg.database() {
            DatabaseLocation::File(path) => open_db(path)?,
            DatabaseLocation::InMemory => open_db_in_memory()?,
        };
        Ok(Self::new(conn))
    }

    /// Opens a fresh in-memory store.
    pub fn in_memory() -> PatientResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn conn(&self) -> PatientResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| PatientError::StoreLockPoisoned)
    }
}

impl PatientStore for SqlitePatientStore {
    fn list_all(&self) -> PatientResult<Vec<Patient>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{PATIENT_SELECT_SQL} ORDER BY rowid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut patients = Vec::new();
        while let Some(row) = rows.next()? {
            patients.push(parse_patient_row(row)?);
        }

        Ok(patients)
    }

    fn find_by_id(&self, id: &PatientId) -> PatientResult<Option<Patient>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{PATIENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_patient_row(row)?));
        }

        Ok(None)
    }

    fn exists_by_id(&self, id: &PatientId) -> PatientResult<bool> {
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1);",
            params![id.to_string()],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }

    fn exists_by_email(&self, email: &EmailAddress) -> PatientResult<bool> {
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE email = ?1);",
            params![email.as_str()],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }

    fn exists_by_email_excluding_id(
        &self,
        email: &EmailAddress,
        id: &PatientId,
    ) -> PatientResult<bool> {
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE email = ?1 AND id <> ?2);",
            params![email.as_str(), id.to_string()],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }

    fn insert(&self, patient: &Patient) -> PatientResult<Patient> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO patients (
                id,
                name,
                email,
                address,
                date_of_birth,
                registered_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                patient.id.to_string(),
                patient.name.as_str(),
                patient.email.as_str(),
                patient.address.as_str(),
                patient.date_of_birth.to_string(),
                patient.registered_date.to_string(),
            ],
        )
        .map_err(|err| map_write_error(err, &patient.email))?;

        Ok(patient.clone())
    }

    fn update(&self, patient: &Patient) -> PatientResult<Patient> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE patients
                 SET
                    name = ?1,
                    email = ?2,
                    address = ?3,
                    date_of_birth = ?4,
                    registered_date = ?5
                 WHERE id = ?6;",
                params![
                    patient.name.as_str(),
                    patient.email.as_str(),
                    patient.address.as_str(),
                    patient.date_of_birth.to_string(),
                    patient.registered_date.to_string(),
                    patient.id.to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, &patient.email))?;

        if changed == 0 {
            return Err(PatientError::NotFound(patient.id));
        }

        Ok(patient.clone())
    }

    fn delete_by_id(&self, id: &PatientId) -> PatientResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM patients WHERE id = ?1;",
            params![id.to_string()],
        )?;

        if changed == 0 {
            return Err(PatientError::NotFound(*id));
        }

        Ok(())
    }
}

fn map_write_error(err: rusqlite::Error, email: &EmailAddress) -> PatientError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            PatientError::DuplicateEmail(email.to_string())
        }
        _ => PatientError::Database(err),
    }
}

fn parse_patient_row(row: &Row<'_>) -> PatientResult<Patient> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let email: String = row.get(2)?;
    let address: String = row.get(3)?;
    let date_of_birth: String = row.get(4)?;
    let registered_date: String = row.get(5)?;

    let id = PatientId::parse(&id)
        .map_err(|e| PatientError::InvalidPersistedData(format!("id: {e}")))?;

    Ok(Patient {
        id,
        name: NonEmptyText::new(&name)
            .map_err(|e| invalid_column(&id, "name", e))?,
        email: EmailAddress::parse(&email)
            .map_err(|e| invalid_column(&id, "email", e))?,
        address: NonEmptyText::new(&address)
            .map_err(|e| invalid_column(&id, "address", e))?,
        date_of_birth: parse_stored_date(&id, "date_of_birth", &date_of_birth)?,
        registered_date: parse_stored_date(&id, "registered_date", &registered_date)?,
    })
}

fn parse_stored_date(id: &PatientId, column: &str, raw: &str) -> PatientResult<NaiveDate> {
    raw.parse::<NaiveDate>()
        .map_err(|e| invalid_column(id, column, e))
}

fn invalid_column(id: &PatientId, column: &str, err: impl std::fmt::Display) -> PatientError {
    PatientError::InvalidPersistedData(format!("patient {id} column {column}: {err}"))
}
