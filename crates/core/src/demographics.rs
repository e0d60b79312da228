//! Patient demographics domain model.
//!
//! A [`Patient`] is only ever built from validated parts: the validator turns
//! a raw request into a [`NewPatient`] or [`PatientChanges`], and the store
//! re-validates rows as it reads them back.

use api_shared::PatientRes;
use chrono::NaiveDate;
use patient_types::{EmailAddress, NonEmptyText};
use patient_uuid::PatientId;

/// A persisted patient record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub registered_date: NaiveDate,
}

/// A validated create request, not yet assigned an identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub registered_date: NaiveDate,
}

impl NewPatient {
    pub fn into_patient(self, id: PatientId) -> Patient {
        Patient {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            date_of_birth: self.date_of_birth,
            registered_date: self.registered_date,
        }
    }
}

/// A validated update request.
///
/// `registered_date` is `None` when the client left it out, in which case the
/// stored value is kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientChanges {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub registered_date: Option<NaiveDate>,
}

impl PatientChanges {
    /// Overwrites every mutable field of `patient`. The identifier is untouched.
    pub fn apply_to(self, patient: &mut Patient) {
        patient.name = self.name;
        patient.email = self.email;
        patient.address = self.address;
        patient.date_of_birth = self.date_of_birth;
        if let Some(registered_date) = self.registered_date {
            patient.registered_date = registered_date;
        }
    }
}

impl From<&Patient> for PatientRes {
    fn from(patient: &Patient) -> Self {
        PatientRes {
            id: patient.id.to_string(),
            name: patient.name.to_string(),
            email: patient.email.to_string(),
            address: patient.address.to_string(),
            date_of_birth: patient.date_of_birth.to_string(),
            registered_date: patient.registered_date.to_string(),
        }
    }
}

impl From<Patient> for PatientRes {
    fn from(patient: Patient) -> Self {
        PatientRes::from(&patient)
    }
}
