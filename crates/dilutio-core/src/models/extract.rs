//! Base paste standardization models.

use serde::{Deserialize, Serialize};

use super::issue::CalcIssue;

/// Default extract form when the technician has not picked one.
pub const DEFAULT_EXTRACT_TYPE: &str = "rosin";

/// Which pair of fields is authoritative for standardization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CalcMode {
    /// Derive concentration from extract mass and COA potency
    #[default]
    Mass,
    /// Use a pre-assayed base concentration directly
    Concentration,
}

/// Raw standardization parameters as entered by the technician.
///
/// Numeric fields stay as strings until parsed; an empty string means
/// "not yet provided", never zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractInput {
    /// Extract form (e.g., "rosin"). Informational only.
    pub extract_type: String,
    /// Active calculation mode
    pub calc_mode: CalcMode,
    /// Raw extract mass in grams (mass mode)
    pub m_extrato: String,
    /// COA potency, percent by mass (mass mode)
    pub p_coa: String,
    /// Declared base concentration in mg/mL (concentration mode)
    pub c_base: String,
    /// Final base paste volume in mL
    pub v_final: String,
}

impl Default for ExtractInput {
    fn default() -> Self {
        Self {
            extract_type: DEFAULT_EXTRACT_TYPE.into(),
            calc_mode: CalcMode::Mass,
            m_extrato: String::new(),
            p_coa: String::new(),
            c_base: String::new(),
            v_final: String::new(),
        }
    }
}

impl ExtractInput {
    /// Mass-mode input.
    pub fn by_mass(m_extrato: &str, p_coa: &str, v_final: &str) -> Self {
        Self {
            calc_mode: CalcMode::Mass,
            m_extrato: m_extrato.into(),
            p_coa: p_coa.into(),
            v_final: v_final.into(),
            ..Self::default()
        }
    }

    /// Concentration-mode input.
    pub fn by_concentration(c_base: &str, v_final: &str) -> Self {
        Self {
            calc_mode: CalcMode::Concentration,
            c_base: c_base.into(),
            v_final: v_final.into(),
            ..Self::default()
        }
    }
}

/// Standardized base paste, recomputed on every input change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaseCalculationResult {
    /// Standardized concentration (mg/mL); 0 when invalid
    pub concentration: f64,
    /// Usable base paste volume (mL); display only when invalid
    pub v_final_base: f64,
    /// Whether every required input for the active mode is present and in range
    pub is_valid: bool,
    /// Per-field issues, empty iff valid
    pub issues: Vec<CalcIssue>,
}

impl BaseCalculationResult {
    /// Build an invalid result carrying its issues.
    pub fn invalid(v_final_base: f64, issues: Vec<CalcIssue>) -> Self {
        Self {
            concentration: 0.0,
            v_final_base,
            is_valid: false,
            issues,
        }
    }

    /// Check if patient fractioning can proceed from this base.
    pub fn is_standardized(&self) -> bool {
        self.is_valid && self.concentration != 0.0
    }
}
