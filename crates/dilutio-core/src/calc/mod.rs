//! Calculation engine.
//!
//! Pipeline: Raw Input → Standardization → Fractioning → Dossier
//!
//! Both stages are pure functions recomputed from scratch on every input
//! snapshot; nothing is cached between calls.

mod fractioner;
mod numeric;
mod standardizer;

pub use fractioner::*;
pub use numeric::*;
pub use standardizer::*;

use serde::{Deserialize, Serialize};

use crate::config::CalcSettings;
use crate::models::{BaseCalculationResult, ExtractInput, FractionResult, PatientPrescription};

/// Combined output of both stages for one input snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Calculation {
    /// Standardized base paste
    pub base: BaseCalculationResult,
    /// Per-patient fractioning
    pub fraction: FractionResult,
}

impl Calculation {
    /// Whether a base-only dossier may be issued.
    pub fn base_issuable(&self) -> bool {
        self.base.is_valid
    }

    /// Whether the full dossier may be issued.
    pub fn full_issuable(&self) -> bool {
        self.base.is_valid && !self.fraction.has_errors
    }

    /// Base paste left after all ready aliquots (mL).
    pub fn remaining_volume(&self) -> f64 {
        remaining_volume(&self.base, &self.fraction)
    }
}

/// Run standardization then fractioning.
pub fn calculate(
    input: &ExtractInput,
    patients: &[PatientPrescription],
    settings: &CalcSettings,
) -> Calculation {
    let base = standardize(input);
    let fraction = fraction_with(&base, patients, settings);
    Calculation { base, fraction }
}
