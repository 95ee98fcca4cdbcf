//! Base paste standardizer.
//!
//! Handles both calculation modes:
//! - Mass: concentration derived from extract mass, COA potency and final volume
//! - Concentration: pre-assayed concentration passed through unchanged

use crate::models::{BaseCalculationResult, CalcIssue, CalcMode, Domain, ExtractInput, Field};

use super::numeric::require;

/// Milligrams per gram.
const MG_PER_G: f64 = 1000.0;

/// Standardize the base paste from raw technician input.
///
/// Never fails: any missing or out-of-range field yields an invalid result
/// with one issue per failing field, in field order.
pub fn standardize(input: &ExtractInput) -> BaseCalculationResult {
    let result = match input.calc_mode {
        CalcMode::Mass => standardize_by_mass(input),
        CalcMode::Concentration => standardize_by_concentration(input),
    };

    tracing::debug!(
        mode = ?input.calc_mode,
        concentration = result.concentration,
        v_final_base = result.v_final_base,
        is_valid = result.is_valid,
        issues = result.issues.len(),
        "standardized base paste"
    );

    result
}

fn standardize_by_mass(input: &ExtractInput) -> BaseCalculationResult {
    let m_extrato = require(Field::MExtrato, &input.m_extrato, Domain::Positive);
    let p_coa = require(Field::PCoa, &input.p_coa, Domain::Percent);
    let v_final = require(Field::VFinal, &input.v_final, Domain::Positive);

    match (m_extrato, p_coa, v_final) {
        (Ok(m_extrato), Ok(p_coa), Ok(v_final)) => {
            let active_mg = m_extrato * (p_coa / 100.0) * MG_PER_G;
            let concentration = active_mg / v_final;
            if !concentration.is_finite() {
                return BaseCalculationResult::invalid(
                    v_final,
                    vec![CalcIssue::OutOfRange {
                        field: Field::MExtrato,
                        value: m_extrato,
                        expected: Domain::Finite,
                    }],
                );
            }
            valid(concentration, v_final)
        }
        (m_extrato, p_coa, v_final) => {
            let display_volume = v_final.as_ref().copied().unwrap_or(0.0);
            BaseCalculationResult::invalid(display_volume, collect_issues([m_extrato, p_coa, v_final]))
        }
    }
}

fn standardize_by_concentration(input: &ExtractInput) -> BaseCalculationResult {
    let c_base = require(Field::CBase, &input.c_base, Domain::Positive);
    let v_final = require(Field::VFinal, &input.v_final, Domain::Positive);

    match (c_base, v_final) {
        (Ok(c_base), Ok(v_final)) => valid(c_base, v_final),
        (c_base, v_final) => {
            let display_volume = v_final.as_ref().copied().unwrap_or(0.0);
            BaseCalculationResult::invalid(display_volume, collect_issues([c_base, v_final]))
        }
    }
}

fn valid(concentration: f64, v_final_base: f64) -> BaseCalculationResult {
    BaseCalculationResult {
        concentration,
        v_final_base,
        is_valid: true,
        issues: Vec::new(),
    }
}

fn collect_issues<const N: usize>(checks: [Result<f64, CalcIssue>; N]) -> Vec<CalcIssue> {
    checks.into_iter().filter_map(Result::err).collect()
}
