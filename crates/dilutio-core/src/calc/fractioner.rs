//! Patient fractioner.
//!
//! Mass balance per bottle: the bottle needs `c_alvo × v_frasco` mg of active
//! ingredient, which is contained in `c_alvo × v_frasco / concentration` mL of
//! base paste.

use crate::config::CalcSettings;
use crate::models::{
    BaseCalculationResult, CalcIssue, Domain, Field, FractionResult, PatientCalculationResult,
    PatientPrescription, RowStatus,
};

use super::numeric::require;

/// Fraction the base paste across patients using default settings.
pub fn fraction(base: &BaseCalculationResult, patients: &[PatientPrescription]) -> FractionResult {
    fraction_with(base, patients, &CalcSettings::default())
}

/// Fraction the base paste across patients.
///
/// Output order matches input order. Rows are evaluated independently; only
/// ready rows contribute to the aggregate demand.
pub fn fraction_with(
    base: &BaseCalculationResult,
    patients: &[PatientPrescription],
    settings: &CalcSettings,
) -> FractionResult {
    let results: Vec<PatientCalculationResult> =
        patients.iter().map(|p| fraction_row(base, p)).collect();

    let total_aliquota_required: f64 = results
        .iter()
        .filter(|r| r.status == RowStatus::Ready)
        .map(|r| r.aliquota_necessaria)
        .sum();

    let base_paste_sufficient = within_supply(
        total_aliquota_required,
        base.v_final_base,
        settings.sufficiency_tolerance,
    );

    let issue = if base_paste_sufficient {
        None
    } else {
        tracing::warn!(
            required = total_aliquota_required,
            available = base.v_final_base,
            "base paste insufficient for prescribed demand"
        );
        Some(CalcIssue::InsufficientBasePaste {
            required: total_aliquota_required,
            available: base.v_final_base,
        })
    };

    let has_errors =
        !base.is_valid || !base_paste_sufficient || results.iter().any(|r| r.is_error());

    tracing::debug!(
        rows = results.len(),
        total = total_aliquota_required,
        sufficient = base_paste_sufficient,
        has_errors,
        "fractioned base paste"
    );

    FractionResult {
        results,
        total_aliquota_required,
        base_paste_sufficient,
        has_errors,
        issue,
    }
}

/// Compute a single patient row.
pub fn fraction_row(
    base: &BaseCalculationResult,
    patient: &PatientPrescription,
) -> PatientCalculationResult {
    if !base.is_standardized() {
        return PatientCalculationResult::invalid(&patient.id, CalcIssue::BaseNotStandardized);
    }

    if patient.is_blank() {
        return PatientCalculationResult::incomplete(&patient.id);
    }

    let c_alvo = match require(Field::CAlvo, &patient.c_alvo, Domain::NonNegative) {
        Ok(v) => v,
        Err(issue) => return PatientCalculationResult::invalid(&patient.id, issue),
    };
    let v_frasco = match require(Field::VFrasco, &patient.v_frasco, Domain::NonNegative) {
        Ok(v) => v,
        Err(issue) => return PatientCalculationResult::invalid(&patient.id, issue),
    };

    // A dose cannot fit in an empty bottle
    if v_frasco == 0.0 && c_alvo > 0.0 {
        return PatientCalculationResult::invalid(
            &patient.id,
            CalcIssue::OutOfRange {
                field: Field::VFrasco,
                value: v_frasco,
                expected: Domain::Positive,
            },
        );
    }

    let aliquota = (c_alvo * v_frasco) / base.concentration;
    if !aliquota.is_finite() {
        return PatientCalculationResult::invalid(
            &patient.id,
            CalcIssue::OutOfRange {
                field: Field::CAlvo,
                value: c_alvo,
                expected: Domain::Finite,
            },
        );
    }
    PatientCalculationResult::ready(&patient.id, aliquota)
}

/// Relative-tolerance check of `required <= available`. Non-finite demand never fits.
pub fn within_supply(required: f64, available: f64, tolerance: f64) -> bool {
    if !required.is_finite() {
        return false;
    }
    let scale = required.abs().max(available.abs());
    required - available <= tolerance * scale
}

/// Base paste left over after all ready rows are drawn (mL); negative on shortfall.
pub fn remaining_volume(base: &BaseCalculationResult, fraction: &FractionResult) -> f64 {
    base.v_final_base - fraction.total_aliquota_required
}
