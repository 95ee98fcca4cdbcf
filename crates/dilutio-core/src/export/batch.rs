//! Batch identifiers and document dates.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format a batch number as `LOT.YYYYMMDD.HHMM`.
pub fn batch_number_at(at: NaiveDateTime) -> String {
    at.format("LOT.%Y%m%d.%H%M").to_string()
}

/// Format a document date as `DD/MM/YYYY`.
pub fn document_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Passthrough identity printed on every dossier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Traceability {
    /// Responsible technician
    pub technician: String,
    /// Batch identifier
    pub batch_number: String,
    /// Document date
    pub date: String,
}

impl Traceability {
    /// Stamp a new batch from the local clock.
    pub fn now(technician: &str) -> Self {
        Self::at(technician, Local::now().naive_local())
    }

    /// Stamp a batch at a given time.
    pub fn at(technician: &str, at: NaiveDateTime) -> Self {
        Self {
            technician: technician.to_string(),
            batch_number: batch_number_at(at),
            date: document_date(at.date()),
        }
    }

    /// Whether a technician has signed this batch.
    pub fn has_technician(&self) -> bool {
        !self.technician.trim().is_empty()
    }
}
