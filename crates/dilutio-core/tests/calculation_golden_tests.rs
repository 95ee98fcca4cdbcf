//! Golden tests for base standardization and patient fractioning.
//!
//! These tests verify the engine against known dosing cases.

use dilutio_core::calc::{calculate, fraction, standardize};
use dilutio_core::models::{
    CalcIssue, CalcMode, ExtractInput, Field, PatientPrescription, RowStatus,
};
use dilutio_core::CalcSettings;

/// Standardization case from golden table.
struct StandardizeCase {
    id: &'static str,
    mode: CalcMode,
    m_extrato: &'static str,
    p_coa: &'static str,
    c_base: &'static str,
    v_final: &'static str,
    expected_valid: bool,
    expected_concentration: f64,
}

fn get_standardize_cases() -> Vec<StandardizeCase> {
    vec![
        StandardizeCase {
            id: "rosin-80pct",
            mode: CalcMode::Mass,
            m_extrato: "10",
            p_coa: "80",
            c_base: "",
            v_final: "100",
            expected_valid: true,
            expected_concentration: 80.0,
        },
        StandardizeCase {
            id: "low-potency-small-batch",
            mode: CalcMode::Mass,
            m_extrato: "2.5",
            p_coa: "20",
            c_base: "",
            v_final: "50",
            expected_valid: true,
            expected_concentration: 10.0,
        },
        StandardizeCase {
            id: "pure-isolate",
            mode: CalcMode::Mass,
            m_extrato: "1",
            p_coa: "100",
            c_base: "",
            v_final: "10",
            expected_valid: true,
            expected_concentration: 100.0,
        },
        StandardizeCase {
            id: "potency-below-zero",
            mode: CalcMode::Mass,
            m_extrato: "10",
            p_coa: "-1",
            c_base: "",
            v_final: "100",
            expected_valid: false,
            expected_concentration: 0.0,
        },
        StandardizeCase {
            id: "potency-above-hundred",
            mode: CalcMode::Mass,
            m_extrato: "10",
            p_coa: "101",
            c_base: "",
            v_final: "100",
            expected_valid: false,
            expected_concentration: 0.0,
        },
        StandardizeCase {
            id: "zero-mass",
            mode: CalcMode::Mass,
            m_extrato: "0",
            p_coa: "80",
            c_base: "",
            v_final: "100",
            expected_valid: false,
            expected_concentration: 0.0,
        },
        StandardizeCase {
            id: "overflowing-mass",
            mode: CalcMode::Mass,
            m_extrato: "1e306",
            p_coa: "100",
            c_base: "",
            v_final: "0.001",
            expected_valid: false,
            expected_concentration: 0.0,
        },
        StandardizeCase {
            id: "huge-but-finite-mass",
            mode: CalcMode::Mass,
            m_extrato: "1e300",
            p_coa: "10",
            c_base: "",
            v_final: "1e300",
            expected_valid: true,
            expected_concentration: 100.0,
        },
        StandardizeCase {
            id: "preassayed-passthrough",
            mode: CalcMode::Concentration,
            m_extrato: "",
            p_coa: "",
            c_base: "27.75",
            v_final: "120",
            expected_valid: true,
            expected_concentration: 27.75,
        },
        StandardizeCase {
            id: "preassayed-missing-volume",
            mode: CalcMode::Concentration,
            m_extrato: "",
            p_coa: "",
            c_base: "50",
            v_final: "",
            expected_valid: false,
            expected_concentration: 0.0,
        },
        StandardizeCase {
            id: "preassayed-negative",
            mode: CalcMode::Concentration,
            m_extrato: "",
            p_coa: "",
            c_base: "-50",
            v_final: "100",
            expected_valid: false,
            expected_concentration: 0.0,
        },
    ]
}

#[test]
fn test_golden_standardization() {
    for case in get_standardize_cases() {
        let input = ExtractInput {
            extract_type: "rosin".into(),
            calc_mode: case.mode,
            m_extrato: case.m_extrato.into(),
            p_coa: case.p_coa.into(),
            c_base: case.c_base.into(),
            v_final: case.v_final.into(),
        };
        let base = standardize(&input);

        assert_eq!(
            base.is_valid, case.expected_valid,
            "Case {}: validity mismatch",
            case.id
        );
        assert!(
            (base.concentration - case.expected_concentration).abs() < 1e-9,
            "Case {}: expected concentration {}, got {}",
            case.id,
            case.expected_concentration,
            base.concentration
        );
        assert_eq!(
            base.issues.is_empty(),
            case.expected_valid,
            "Case {}: issues should be empty iff valid",
            case.id
        );
    }
}

#[test]
fn test_golden_aliquots() {
    let base = standardize(&ExtractInput::by_mass("10", "80", "100"));

    // (c_alvo, v_frasco, expected aliquot mL)
    let aliquot_tests = vec![
        ("20", "30", 7.5),
        ("0", "30", 0.0),
        ("80", "10", 10.0),
        ("5", "20", 1.25),
        ("40", "100", 50.0),
    ];

    for (c_alvo, v_frasco, expected) in aliquot_tests {
        let out = fraction(&base, &[PatientPrescription::new("P", c_alvo, v_frasco)]);
        let row = &out.results[0];
        assert_eq!(row.status, RowStatus::Ready, "{} × {}", c_alvo, v_frasco);
        assert!(
            (row.aliquota_necessaria - expected).abs() < 1e-9,
            "{} mg/mL × {} mL should need {} mL, got {}",
            c_alvo,
            v_frasco,
            expected,
            row.aliquota_necessaria
        );
    }
}

#[test]
fn test_insufficient_base_reference() {
    // 50 mL of base at 50 mg/mL; each patient needs 30 mL
    let base = standardize(&ExtractInput::by_concentration("50", "50"));
    let patients = vec![
        PatientPrescription::new("A", "30", "50"),
        PatientPrescription::new("B", "30", "50"),
    ];
    let out = fraction(&base, &patients);

    assert!((out.total_aliquota_required - 60.0).abs() < 1e-9);
    assert!(!out.base_paste_sufficient);
    assert!(out.has_errors);
    assert_eq!(
        out.issue,
        Some(CalcIssue::InsufficientBasePaste {
            required: out.total_aliquota_required,
            available: 50.0,
        })
    );
    // Rows themselves are still valid
    assert!(out.results.iter().all(|r| r.is_valid));
}

#[test]
fn test_overflowing_demand_blocks_issuance() {
    let input = ExtractInput::by_concentration("80", "100");
    let patients = vec![
        PatientPrescription::new("A", "20", "30"),
        PatientPrescription::new("B", "1e200", "1e200"),
    ];
    let calc = calculate(&input, &patients, &CalcSettings::default());

    assert_eq!(calc.fraction.results[0].status, RowStatus::Ready);
    assert!(matches!(
        calc.fraction.results[1].error,
        Some(CalcIssue::OutOfRange { field: Field::CAlvo, .. })
    ));
    assert!(calc.fraction.total_aliquota_required.is_finite());
    assert!((calc.fraction.total_aliquota_required - 7.5).abs() < 1e-9);
    assert!(calc.fraction.has_errors);
    assert!(!calc.full_issuable());
}

#[test]
fn test_overflowing_sum_is_insufficient() {
    // 1e308 mL per bottle at 1 mg/mL; two bottles overflow the total
    let base = standardize(&ExtractInput::by_concentration("1", "100"));
    let patients = vec![
        PatientPrescription::new("A", "1e154", "1e154"),
        PatientPrescription::new("B", "1e154", "1e154"),
    ];
    let out = fraction(&base, &patients);

    assert!(!out.base_paste_sufficient);
    assert!(out.has_errors);
    assert!(matches!(
        out.issue,
        Some(CalcIssue::InsufficientBasePaste { .. })
    ));
}

#[test]
fn test_overflowing_base_never_yields_valid_doses() {
    let input = ExtractInput::by_mass("1e306", "100", "0.001");
    let patients = vec![PatientPrescription::new("A", "20", "30")];
    let calc = calculate(&input, &patients, &CalcSettings::default());

    assert!(!calc.base.is_valid);
    assert_eq!(
        calc.fraction.results[0].error,
        Some(CalcIssue::BaseNotStandardized)
    );
    assert!(!calc.base_issuable());
}

#[test]
fn test_exact_fill_is_sufficient() {
    // 0.1 + 0.2 mL of demand against 0.3 mL of paste
    let base = standardize(&ExtractInput::by_concentration("10", "0.3"));
    let patients = vec![
        PatientPrescription::new("A", "1", "1"),
        PatientPrescription::new("B", "2", "1"),
    ];
    let out = fraction(&base, &patients);
    assert!(out.base_paste_sufficient);
    assert!(!out.has_errors);
}

#[test]
fn test_order_preserved_with_blank_rows() {
    let base = standardize(&ExtractInput::by_mass("10", "80", "100"));
    let patients = vec![
        PatientPrescription::blank(),
        PatientPrescription::new("A", "20", "30"),
        PatientPrescription::new("B", "bad", "30"),
        PatientPrescription::blank(),
    ];
    let out = fraction(&base, &patients);

    assert_eq!(out.results.len(), patients.len());
    for (p, r) in patients.iter().zip(&out.results) {
        assert_eq!(p.id, r.id);
    }
    assert_eq!(out.results[0].status, RowStatus::Incomplete);
    assert_eq!(out.results[1].status, RowStatus::Ready);
    assert_eq!(
        out.results[2].error,
        Some(CalcIssue::MissingField { field: Field::CAlvo })
    );
    assert_eq!(out.results[3].status, RowStatus::Incomplete);
}

#[test]
fn test_removing_invalid_row_keeps_valid_rows() {
    let input = ExtractInput::by_mass("10", "80", "100");
    let settings = CalcSettings::default();
    let good_a = PatientPrescription::new("A", "20", "30");
    let bad = PatientPrescription::new("B", "20", "0");
    let good_b = PatientPrescription::new("C", "10", "20");

    let with_bad = calculate(&input, &[good_a.clone(), bad, good_b.clone()], &settings);
    let without_bad = calculate(&input, &[good_a.clone(), good_b.clone()], &settings);

    assert!(with_bad.fraction.has_errors);
    assert!(!without_bad.fraction.has_errors);
    assert_eq!(
        with_bad.fraction.result_for(&good_a.id),
        without_bad.fraction.result_for(&good_a.id)
    );
    assert_eq!(
        with_bad.fraction.result_for(&good_b.id),
        without_bad.fraction.result_for(&good_b.id)
    );
    assert_eq!(
        with_bad.fraction.total_aliquota_required,
        without_bad.fraction.total_aliquota_required
    );
}

#[test]
fn test_idempotent_calculation() {
    let input = ExtractInput::by_mass("7.3", "63.1", "91.7");
    let patients = vec![
        PatientPrescription::new("A", "13.7", "30"),
        PatientPrescription::new("B", "2.2", "10"),
        PatientPrescription::blank(),
    ];
    let settings = CalcSettings::default();

    let first = calculate(&input, &patients, &settings);
    let second = calculate(&input, &patients, &settings);

    assert_eq!(first, second);
    assert_eq!(
        first.fraction.total_aliquota_required.to_bits(),
        second.fraction.total_aliquota_required.to_bits()
    );
    assert_eq!(
        first.base.concentration.to_bits(),
        second.base.concentration.to_bits()
    );
}
