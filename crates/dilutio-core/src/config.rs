//! Calculation settings.

use serde::{Deserialize, Serialize};

/// Default relative tolerance for the sufficiency check.
pub const DEFAULT_SUFFICIENCY_TOLERANCE: f64 = 1e-9;

/// Tunable engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalcSettings {
    /// Relative epsilon applied when comparing demand against available base paste
    pub sufficiency_tolerance: f64,
}

impl Default for CalcSettings {
    fn default() -> Self {
        Self {
            sufficiency_tolerance: DEFAULT_SUFFICIENCY_TOLERANCE,
        }
    }
}

impl CalcSettings {
    /// Override the sufficiency tolerance. Negative or non-finite values fall back to exact comparison.
    pub fn with_sufficiency_tolerance(mut self, tolerance: f64) -> Self {
        self.sufficiency_tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            0.0
        };
        self
    }

    /// Load settings from JSON; missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: CalcSettings = serde_json::from_str(json)?;
        let tolerance = settings.sufficiency_tolerance;
        Ok(settings.with_sufficiency_tolerance(tolerance))
    }
}
