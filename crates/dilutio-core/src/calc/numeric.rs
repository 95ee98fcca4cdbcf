//! Shared parse-and-validate helpers for string-typed numeric inputs.

use crate::models::{CalcIssue, Domain, Field};

/// Parse a raw amount. Blank, non-numeric and non-finite input all yield `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a required field and check it against its domain.
pub fn require(field: Field, raw: &str, domain: Domain) -> Result<f64, CalcIssue> {
    let value = parse_amount(raw).ok_or(CalcIssue::MissingField { field })?;
    if domain.contains(value) {
        Ok(value)
    } else {
        Err(CalcIssue::OutOfRange {
            field,
            value,
            expected: domain,
        })
    }
}

/// Edit-boundary check: empty is allowed, anything else must be a number >= 0.
pub fn is_acceptable_edit(raw: &str) -> bool {
    if raw.is_empty() {
        return true;
    }
    parse_amount(raw).is_some_and(|v| Domain::NonNegative.contains(v))
}
