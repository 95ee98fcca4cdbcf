//! Dossier export for the document renderer.
//!
//! The dossier carries calculated values verbatim; the renderer formats,
//! never re-derives.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::batch::Traceability;
use crate::calc::Calculation;
use crate::models::{CalcMode, ExtractInput, PatientPrescription, RowStatus};

/// Dossier format version.
pub const DOSSIER_FORMAT_VERSION: &str = "1.0";

/// Dossier errors.
#[derive(Error, Debug)]
pub enum DossierError {
    #[error("Technician name is required")]
    MissingTechnician,

    #[error("Base paste not standardized")]
    BaseNotStandardized,

    #[error("Calculation has unresolved errors")]
    UnresolvedErrors,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DossierResult<T> = Result<T, DossierError>;

/// Which document is being issued.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DossierKind {
    /// Base paste standardization only
    Base,
    /// Standardization plus every patient aliquot
    Full,
}

/// Dossier metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DossierMetadata {
    /// Export format version
    pub format_version: String,
    /// Document kind
    pub kind: DossierKind,
    /// Generation timestamp (RFC 3339)
    pub generated_at: String,
    /// Batch identity
    pub traceability: Traceability,
}

/// Standardized base section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaseSection {
    pub extract_type: String,
    pub calc_mode: CalcMode,
    /// COA potency exactly as entered
    pub p_coa: String,
    pub concentration: f64,
    pub v_final_base: f64,
}

/// One dispensed bottle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientLine {
    pub id: String,
    pub name: String,
    pub c_alvo: String,
    pub v_frasco: String,
    pub aliquota_necessaria: f64,
}

/// Fractioning section of a full dossier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FractionSection {
    pub patients: Vec<PatientLine>,
    pub total_aliquota_required: f64,
    pub remaining_volume: f64,
}

/// Printable record of one batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dossier {
    pub metadata: DossierMetadata,
    pub base: BaseSection,
    /// Present only for full dossiers
    pub fraction: Option<FractionSection>,
}

impl Dossier {
    /// Assemble a dossier, refusing when the calculation does not allow issuance.
    ///
    /// Base dossiers need a technician and a valid base. Full dossiers also
    /// need an error-free fractioning. Blank rows are omitted.
    pub fn build(
        kind: DossierKind,
        traceability: &Traceability,
        input: &ExtractInput,
        patients: &[PatientPrescription],
        calc: &Calculation,
    ) -> DossierResult<Self> {
        if !traceability.has_technician() {
            return Err(DossierError::MissingTechnician);
        }
        if !calc.base_issuable() {
            return Err(DossierError::BaseNotStandardized);
        }

        let fraction = match kind {
            DossierKind::Base => None,
            DossierKind::Full => {
                if !calc.full_issuable() {
                    return Err(DossierError::UnresolvedErrors);
                }
                Some(fraction_section(patients, calc))
            }
        };

        tracing::debug!(
            ?kind,
            batch = %traceability.batch_number,
            "built dossier"
        );

        Ok(Self {
            metadata: DossierMetadata {
                format_version: DOSSIER_FORMAT_VERSION.into(),
                kind,
                generated_at: chrono::Utc::now().to_rfc3339(),
                traceability: traceability.clone(),
            },
            base: BaseSection {
                extract_type: input.extract_type.clone(),
                calc_mode: input.calc_mode,
                p_coa: input.p_coa.clone(),
                concentration: calc.base.concentration,
                v_final_base: calc.base.v_final_base,
            },
            fraction,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> DossierResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn fraction_section(patients: &[PatientPrescription], calc: &Calculation) -> FractionSection {
    let lines = patients
        .iter()
        .filter_map(|patient| {
            calc.fraction
                .result_for(&patient.id)
                .map(|result| (patient, result))
        })
        .filter(|(_, result)| result.status == RowStatus::Ready)
        .map(|(patient, result)| PatientLine {
            id: patient.id.clone(),
            name: patient.name.clone(),
            c_alvo: patient.c_alvo.clone(),
            v_frasco: patient.v_frasco.clone(),
            aliquota_necessaria: result.aliquota_necessaria,
        })
        .collect();

    FractionSection {
        patients: lines,
        total_aliquota_required: calc.fraction.total_aliquota_required,
        remaining_volume: calc.remaining_volume(),
    }
}
