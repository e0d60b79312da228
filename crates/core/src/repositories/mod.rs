//! Persistence for patient records.
//!
//! The lifecycle manager only sees the [`patients::PatientStore`] trait; SQL
//! stays inside this module.

pub mod patients;
