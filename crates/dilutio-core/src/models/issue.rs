//! Validation issues surfaced as data by the calculation engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A technician-entered numeric input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Field {
    /// Raw extract mass (g)
    MExtrato,
    /// Certificate-of-analysis potency (% by mass)
    PCoa,
    /// Declared base concentration (mg/mL)
    CBase,
    /// Final base paste volume (mL)
    VFinal,
    /// Patient target concentration (mg/mL)
    CAlvo,
    /// Patient bottle volume (mL)
    VFrasco,
}

impl Field {
    /// Input key as used by the form layer.
    pub fn key(&self) -> &'static str {
        match self {
            Field::MExtrato => "m_extrato",
            Field::PCoa => "p_coa",
            Field::CBase => "c_base",
            Field::VFinal => "v_final",
            Field::CAlvo => "c_alvo",
            Field::VFrasco => "v_frasco",
        }
    }

    /// Human-readable label with unit.
    pub fn label(&self) -> &'static str {
        match self {
            Field::MExtrato => "extract mass (g)",
            Field::PCoa => "COA potency (%)",
            Field::CBase => "base concentration (mg/mL)",
            Field::VFinal => "final volume (mL)",
            Field::CAlvo => "target concentration (mg/mL)",
            Field::VFrasco => "bottle volume (mL)",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepted numeric domain for a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Domain {
    /// Strictly greater than zero
    Positive,
    /// Zero or greater
    NonNegative,
    /// Between 0 and 100 inclusive
    Percent,
    /// Small enough that derived amounts stay finite
    Finite,
}

impl Domain {
    /// Check whether a value lies inside this domain.
    pub fn contains(&self, value: f64) -> bool {
        match self {
            Domain::Positive => value > 0.0,
            Domain::NonNegative => value >= 0.0,
            Domain::Percent => (0.0..=100.0).contains(&value),
            Domain::Finite => value.is_finite(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Positive => f.write_str("greater than 0"),
            Domain::NonNegative => f.write_str("0 or greater"),
            Domain::Percent => f.write_str("between 0 and 100"),
            Domain::Finite => f.write_str("a value with a finite result"),
        }
    }
}

/// A recoverable calculation issue, attached to the smallest scope it affects.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CalcIssue {
    #[error("Missing value: {field}")]
    MissingField { field: Field },

    #[error("Out of range: {field} is {value}, expected {expected}")]
    OutOfRange {
        field: Field,
        value: f64,
        expected: Domain,
    },

    #[error("Base paste not standardized")]
    BaseNotStandardized,

    #[error("Insufficient base paste: {required:.3} mL required, {available:.3} mL available")]
    InsufficientBasePaste { required: f64, available: f64 },
}

impl CalcIssue {
    /// The input field this issue points at, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            CalcIssue::MissingField { field } | CalcIssue::OutOfRange { field, .. } => {
                Some(*field)
            }
            CalcIssue::BaseNotStandardized | CalcIssue::InsufficientBasePaste { .. } => None,
        }
    }
}
