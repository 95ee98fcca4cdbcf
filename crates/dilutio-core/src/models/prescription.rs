//! Patient prescription and fractioning models.

use serde::{Deserialize, Serialize};

use super::issue::CalcIssue;

/// One row of patient demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientPrescription {
    /// Opaque row identity (UUID), used only for list editing
    pub id: String,
    /// Patient name, not used in arithmetic
    pub name: String,
    /// Target concentration in the dispensed bottle (mg/mL)
    pub c_alvo: String,
    /// Dispensing bottle volume (mL)
    pub v_frasco: String,
}

impl PatientPrescription {
    /// Create a blank row with a fresh identity.
    pub fn blank() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            c_alvo: String::new(),
            v_frasco: String::new(),
        }
    }

    /// Create a filled-in row with a fresh identity.
    pub fn new(name: &str, c_alvo: &str, v_frasco: &str) -> Self {
        Self {
            name: name.into(),
            c_alvo: c_alvo.into(),
            v_frasco: v_frasco.into(),
            ..Self::blank()
        }
    }

    /// Neither dosing field has been entered yet.
    pub fn is_blank(&self) -> bool {
        self.c_alvo.trim().is_empty() && self.v_frasco.trim().is_empty()
    }
}

/// Editable prescription fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PrescriptionField {
    Name,
    CAlvo,
    VFrasco,
}

/// Outcome class of a single patient row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RowStatus {
    /// Complete and in range; aliquot computed
    Ready,
    /// Fully blank row, not yet an error
    Incomplete,
    /// Contradictory, out-of-range or blocked by the base
    Invalid,
}

/// Per-patient fractioning result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientCalculationResult {
    /// Source row id
    pub id: String,
    /// Base paste volume to withdraw (mL); 0 unless ready
    pub aliquota_necessaria: f64,
    /// Row outcome
    pub status: RowStatus,
    /// True iff the row is ready
    pub is_valid: bool,
    /// Failing condition, set iff the row is invalid
    pub error: Option<CalcIssue>,
}

impl PatientCalculationResult {
    pub fn ready(id: &str, aliquota_necessaria: f64) -> Self {
        Self {
            id: id.into(),
            aliquota_necessaria,
            status: RowStatus::Ready,
            is_valid: true,
            error: None,
        }
    }

    pub fn incomplete(id: &str) -> Self {
        Self {
            id: id.into(),
            aliquota_necessaria: 0.0,
            status: RowStatus::Incomplete,
            is_valid: false,
            error: None,
        }
    }

    pub fn invalid(id: &str, error: CalcIssue) -> Self {
        Self {
            id: id.into(),
            aliquota_necessaria: 0.0,
            status: RowStatus::Invalid,
            is_valid: false,
            error: Some(error),
        }
    }

    /// Whether this row blocks document issuance.
    pub fn is_error(&self) -> bool {
        self.status == RowStatus::Invalid
    }
}

/// Aggregate fractioning output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FractionResult {
    /// Per-row results, same order as the input
    pub results: Vec<PatientCalculationResult>,
    /// Sum of aliquots over ready rows (mL)
    pub total_aliquota_required: f64,
    /// Whether available base paste covers total demand
    pub base_paste_sufficient: bool,
    /// Any invalid row, insufficient paste, or invalid base
    pub has_errors: bool,
    /// Aggregate issue (insufficiency)
    pub issue: Option<CalcIssue>,
}

impl FractionResult {
    /// Find the result for a given row id.
    pub fn result_for(&self, id: &str) -> Option<&PatientCalculationResult> {
        self.results.iter().find(|r| r.id == id)
    }

    /// Count rows that contribute to the aggregate.
    pub fn ready_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == RowStatus::Ready)
            .count()
    }
}
