//! Patient lifecycle service.
//!
//! [`PatientService`] is the only component that holds cross-record
//! invariants: one record per identifier and no two records sharing an email
//! address. It knows nothing about HTTP; callers translate its
//! [`PatientError`]s into whatever their transport needs.

use crate::demographics::Patient;
use crate::repositories::patients::PatientStore;
use crate::validation::{validate_create, validate_update};
use crate::{PatientError, PatientResult};
use api_shared::PatientReq;
use patient_uuid::PatientId;
use std::sync::Arc;
use tracing::Span;

/// Pure patient data operations - no API concerns
///
/// Every uniqueness and existence check runs before the mutating store call,
/// so a rejected request leaves the store unchanged.
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
    span: Span,
}

impl PatientService {
    /// Creates a service over `store`, logging under a `patient_service` span.
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self::with_span(store, tracing::info_span!("patient_service"))
    }

    /// Creates a service that logs under the supplied span.
    ///
    /// Pass `Span::none()` to silence the service, or a span carrying extra
    /// fields to tag every event it emits.
    pub fn with_span(store: Arc<dyn PatientStore>, span: Span) -> Self {
        Self { store, span }
    }

    /// Lists every patient in storage order.
    pub fn list(&self) -> PatientResult<Vec<Patient>> {
        let _enter = self.span.enter();

        let patients = self.store.list_all()?;
        tracing::info!(count = patients.len(), "fetched all patients");
        Ok(patients)
    }

    /// Fetches one patient.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` if `id` is not a canonical patient id
    /// - `NotFound` if no record has that id
    pub fn get(&self, id: &str) -> PatientResult<Patient> {
        let _enter = self.span.enter();

        let id = parse_id(id)?;
        let patient = self
            .store
            .find_by_id(&id)?
            .ok_or(PatientError::NotFound(id))?;

        tracing::info!(patient_id = %id, "fetched patient");
        Ok(patient)
    }

    /// Creates a patient with a freshly allocated identifier.
    ///
    /// # Errors
    ///
    /// - `Validation` listing every invalid field
    /// - `DuplicateEmail` if any record already uses the email
    pub fn create(&self, req: &PatientReq) -> PatientResult<Patient> {
        let _enter = self.span.enter();

        let new_patient = validate_create(req)?;

        if self.store.exists_by_email(&new_patient.email)? {
            tracing::warn!("create rejected: email already exists");
            return Err(PatientError::DuplicateEmail(new_patient.email.to_string()));
        }

        let patient = self.store.insert(&new_patient.into_patient(PatientId::new()))?;

        tracing::info!(patient_id = %patient.id, "created patient");
        Ok(patient)
    }

    /// Replaces every mutable field of an existing patient.
    ///
    /// An omitted `registeredDate` keeps the stored value. Keeping the
    /// patient's own email is always allowed.
    ///
    /// # Errors
    ///
    /// - `Validation` listing every invalid field
    /// - `InvalidIdentifier` / `NotFound` as for [`get`](Self::get)
    /// - `DuplicateEmail` if a *different* record uses the email
    pub fn update(&self, id: &str, req: &PatientReq) -> PatientResult<Patient> {
        let _enter = self.span.enter();

        let changes = validate_update(req)?;
        let id = parse_id(id)?;

        let mut patient = self
            .store
            .find_by_id(&id)?
            .ok_or(PatientError::NotFound(id))?;

        if self.store.exists_by_email_excluding_id(&changes.email, &id)? {
            tracing::warn!(patient_id = %id, "update rejected: email already exists");
            return Err(PatientError::DuplicateEmail(changes.email.to_string()));
        }

        changes.apply_to(&mut patient);
        let patient = self.store.update(&patient)?;

        tracing::info!(patient_id = %id, "updated patient");
        Ok(patient)
    }

    /// Permanently removes a patient.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` / `NotFound` as for [`get`](Self::get)
    pub fn delete(&self, id: &str) -> PatientResult<()> {
        let _enter = self.span.enter();

        let id = parse_id(id)?;
        if !self.store.exists_by_id(&id)? {
            return Err(PatientError::NotFound(id));
        }

        self.store.delete_by_id(&id)?;

        tracing::info!(patient_id = %id, "deleted patient");
        Ok(())
    }
}

fn parse_id(id: &str) -> PatientResult<PatientId> {
    PatientId::parse(id).map_err(PatientError::InvalidIdentifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::patients::SqlitePatientStore;
    use patient_types::EmailAddress;

    fn service() -> PatientService {
        let store = SqlitePatientStore::in_memory().expect("in-memory store should open");
        PatientService::with_span(Arc::new(store), Span::none())
    }

    fn req(name: &str, email: &str) -> PatientReq {
        PatientReq {
            name: Some(name.into()),
            email: Some(email.into()),
            address: Some("1 Main St".into()),
            date_of_birth: Some("1990-01-01".into()),
            registered_date: Some("2024-01-01".into()),
        }
    }

    fn count(service: &PatientService) -> usize {
        service.list().expect("list should succeed").len()
    }

    #[test]
    fn create_returns_input_fields_with_new_id() {
        let service = service();

        let first = service.create(&req("Alice", "a@x.com")).unwrap();
        let second = service.create(&req("Bob", "b@x.com")).unwrap();

        assert_eq!(first.name.as_str(), "Alice");
        assert_eq!(first.email.as_str(), "a@x.com");
        assert_eq!(first.address.as_str(), "1 Main St");
        assert_eq!(first.date_of_birth.to_string(), "1990-01-01");
        assert_eq!(first.registered_date.to_string(), "2024-01-01");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn create_then_get_round_trips() {
        let service = service();
        let created = service.create(&req("Alice", "a@x.com")).unwrap();

        let fetched = service.get(&created.id.to_string()).unwrap();

        assert_eq!(fetched, created);
    }

    #[test]
    fn create_with_existing_email_is_rejected_and_store_unchanged() {
        let service = service();
        service.create(&req("Alice", "a@x.com")).unwrap();

        let err = service.create(&req("Impostor", "a@x.com")).unwrap_err();

        assert!(matches!(err, PatientError::DuplicateEmail(_)));
        assert_eq!(count(&service), 1);
    }

    #[test]
    fn email_uniqueness_ignores_case_and_whitespace() {
        let service = service();
        service.create(&req("Alice", "a@x.com")).unwrap();

        let err = service.create(&req("Alice 2", "  A@X.COM ")).unwrap_err();

        assert!(matches!(err, PatientError::DuplicateEmail(_)));
    }

    #[test]
    fn invalid_create_touches_nothing() {
        let service = service();

        let err = service.create(&PatientReq::default()).unwrap_err();

        assert!(matches!(err, PatientError::Validation(ref e) if e.len() == 5));
        assert_eq!(count(&service), 0);
    }

    #[test]
    fn malformed_and_missing_ids_are_distinguished() {
        let service = service();
        let absent = PatientId::new().to_string();

        for op in ["get", "update", "delete"] {
            let malformed = match op {
                "get" => service.get("not-an-id").map(|_| ()),
                "update" => service.update("not-an-id", &req("A", "a@x.com")).map(|_| ()),
                _ => service.delete("not-an-id"),
            };
            assert!(
                matches!(malformed, Err(PatientError::InvalidIdentifier(_))),
                "{op} with malformed id"
            );

            let missing = match op {
                "get" => service.get(&absent).map(|_| ()),
                "update" => service.update(&absent, &req("A", "a@x.com")).map(|_| ()),
                _ => service.delete(&absent),
            };
            assert!(
                matches!(missing, Err(PatientError::NotFound(_))),
                "{op} with absent id"
            );
        }
    }

    #[test]
    fn update_to_own_email_succeeds() {
        let service = service();
        let alice = service.create(&req("Alice", "a@x.com")).unwrap();

        let updated = service
            .update(&alice.id.to_string(), &req("Alice Smith", "a@x.com"))
            .unwrap();

        assert_eq!(updated.id, alice.id);
        assert_eq!(updated.name.as_str(), "Alice Smith");
    }

    #[test]
    fn update_to_other_patients_email_is_rejected() {
        let service = service();
        service.create(&req("Alice", "a@x.com")).unwrap();
        let bob = service.create(&req("Bob", "b@x.com")).unwrap();

        let err = service
            .update(&bob.id.to_string(), &req("Bob", "a@x.com"))
            .unwrap_err();

        assert!(matches!(err, PatientError::DuplicateEmail(_)));
        let stored = service.get(&bob.id.to_string()).unwrap();
        assert_eq!(stored.email.as_str(), "b@x.com");
    }

    #[test]
    fn update_replaces_fields_and_keeps_registered_date_when_omitted() {
        let service = service();
        let alice = service.create(&req("Alice", "a@x.com")).unwrap();

        let changes = PatientReq {
            name: Some("Alice B".into()),
            email: Some("a2@x.com".into()),
            address: Some("2 Side St".into()),
            date_of_birth: Some("1991-02-03".into()),
            registered_date: None,
        };
        let updated = service.update(&alice.id.to_string(), &changes).unwrap();

        assert_eq!(updated.id, alice.id);
        assert_eq!(updated.email.as_str(), "a2@x.com");
        assert_eq!(updated.address.as_str(), "2 Side St");
        assert_eq!(updated.date_of_birth.to_string(), "1991-02-03");
        assert_eq!(updated.registered_date, alice.registered_date);
        assert_eq!(service.get(&alice.id.to_string()).unwrap(), updated);
    }

    #[test]
    fn delete_twice_reports_not_found_second_time() {
        let service = service();
        let alice = service.create(&req("Alice", "a@x.com")).unwrap();
        let id = alice.id.to_string();

        service.delete(&id).expect("first delete succeeds");
        let err = service.delete(&id).unwrap_err();

        assert!(matches!(err, PatientError::NotFound(found) if found == alice.id));
        assert_eq!(count(&service), 0);
    }

    #[test]
    fn list_returns_creation_order() {
        let service = service();
        for (name, email) in [("A", "a@x.com"), ("B", "b@x.com"), ("C", "c@x.com")] {
            service.create(&req(name, email)).unwrap();
        }

        let names: Vec<String> = service
            .list()
            .unwrap()
            .into_iter()
            .map(|p| p.name.to_string())
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    /// A store whose email pre-checks always miss, as if a concurrent writer
    /// inserted between the check and the write.
    struct RacingStore(SqlitePatientStore);

    impl PatientStore for RacingStore {
        fn list_all(&self) -> PatientResult<Vec<Patient>> {
            self.0.list_all()
        }
        fn find_by_id(&self, id: &PatientId) -> PatientResult<Option<Patient>> {
            self.0.find_by_id(id)
        }
        fn exists_by_id(&self, id: &PatientId) -> PatientResult<bool> {
            self.0.exists_by_id(id)
        }
        fn exists_by_email(&self, _email: &EmailAddress) -> PatientResult<bool> {
            Ok(false)
        }
        fn exists_by_email_excluding_id(
            &self,
            _email: &EmailAddress,
            _id: &PatientId,
        ) -> PatientResult<bool> {
            Ok(false)
        }
        fn insert(&self, patient: &Patient) -> PatientResult<Patient> {
            self.0.insert(patient)
        }
        fn update(&self, patient: &Patient) -> PatientResult<Patient> {
            self.0.update(patient)
        }
        fn delete_by_id(&self, id: &PatientId) -> PatientResult<()> {
            self.0.delete_by_id(id)
        }
    }

    #[test]
    fn store_constraint_closes_check_then_write_race() {
        let store = RacingStore(SqlitePatientStore::in_memory().unwrap());
        let service = PatientService::with_span(Arc::new(store), Span::none());
        service.create(&req("Alice", "a@x.com")).unwrap();
        let bob = service.create(&req("Bob", "b@x.com")).unwrap();

        let create_err = service.create(&req("Racer", "a@x.com")).unwrap_err();
        let update_err = service
            .update(&bob.id.to_string(), &req("Bob", "a@x.com"))
            .unwrap_err();

        assert!(matches!(create_err, PatientError::DuplicateEmail(_)));
        assert!(matches!(update_err, PatientError::DuplicateEmail(_)));
        assert_eq!(count(&service), 2);
    }
}
