//! Prescription roster: the identity-stable list of patient rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calc::is_acceptable_edit;
use crate::models::{PatientPrescription, PrescriptionField};

/// Roster errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    #[error("Prescription not found: {0}")]
    NotFound(String),

    #[error("Invalid value for {field:?}: {value:?}")]
    InvalidValue {
        field: PrescriptionField,
        value: String,
    },
}

pub type RosterResult<T> = Result<T, RosterError>;

/// Ordered collection of prescriptions keyed by row id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionRoster {
    entries: Vec<PatientPrescription>,
}

impl Default for PrescriptionRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl PrescriptionRoster {
    /// Create a roster holding a single blank row, ready for entry.
    pub fn new() -> Self {
        Self {
            entries: vec![PatientPrescription::blank()],
        }
    }

    /// Create a roster with no rows.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a blank row and return its id.
    pub fn add(&mut self) -> String {
        let row = PatientPrescription::blank();
        let id = row.id.clone();
        self.entries.push(row);
        id
    }

    /// Remove a row, returning it if it existed.
    pub fn remove(&mut self, id: &str) -> Option<PatientPrescription> {
        let index = self.entries.iter().position(|p| p.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Update one field of a row.
    ///
    /// Dosing fields accept only an empty string or a number >= 0. A rejected
    /// edit leaves the prior value in place.
    pub fn update(&mut self, id: &str, field: PrescriptionField, value: &str) -> RosterResult<()> {
        let row = self
            .entries
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RosterError::NotFound(id.to_string()))?;

        let slot = match field {
            PrescriptionField::Name => &mut row.name,
            PrescriptionField::CAlvo => &mut row.c_alvo,
            PrescriptionField::VFrasco => &mut row.v_frasco,
        };

        if field != PrescriptionField::Name && !is_acceptable_edit(value) {
            tracing::warn!(id, ?field, value, "rejected prescription edit");
            return Err(RosterError::InvalidValue {
                field,
                value: value.to_string(),
            });
        }

        *slot = value.to_string();
        Ok(())
    }

    /// Get a row by id.
    pub fn get(&self, id: &str) -> Option<&PatientPrescription> {
        self.entries.iter().find(|p| p.id == id)
    }

    /// All rows in display order.
    pub fn as_slice(&self) -> &[PatientPrescription] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatientPrescription> {
        self.entries.iter()
    }
}
