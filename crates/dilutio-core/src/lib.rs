//! Dilutio Core Library
//!
//! Base paste standardization and per-patient dilution dosing for
//! compounding cannabis-extract oils.
//!
//! # Architecture
//!
//! ```text
//! ExtractInput ──▶ Standardizer ──▶ BaseCalculationResult
//!                                          │
//! PrescriptionRoster ─────────────▶ Fractioner
//!                                          │
//!                                          ▼
//!                       FractionResult { results, total, sufficient, has_errors }
//!                                          │
//!                             ┌────────────┴────────────┐
//!                             ▼                         ▼
//!                        Base Dossier              Full Dossier
//! ```
//!
//! # Core Principle
//!
//! **Validation is data.** The engine never fails; invalid input shows up as
//! issues and flags on the result, scoped to the field or row it affects.
//!
//! # Modules
//!
//! - [`models`]: Domain types (ExtractInput, PatientPrescription, results, issues)
//! - [`calc`]: Standardizer, fractioner and shared numeric validation
//! - [`roster`]: Identity-stable prescription list with edit guards
//! - [`config`]: Calculation settings
//! - [`export`]: Dossier assembly and batch identity

pub mod calc;
pub mod config;
pub mod export;
pub mod models;
pub mod roster;

// Re-export commonly used types
pub use calc::{calculate, fraction, standardize, Calculation};
pub use config::CalcSettings;
pub use export::{Dossier, DossierKind, Traceability};
pub use models::{
    BaseCalculationResult, CalcIssue, CalcMode, ExtractInput, Field, FractionResult,
    PatientCalculationResult, PatientPrescription, PrescriptionField, RowStatus,
};
pub use roster::PrescriptionRoster;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DilutioError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Issuance blocked: {0}")]
    IssuanceBlocked(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Session error: {0}")]
    SessionError(String),
}

impl From<roster::RosterError> for DilutioError {
    fn from(e: roster::RosterError) -> Self {
        match e {
            roster::RosterError::NotFound(id) => DilutioError::NotFound(id),
            other => DilutioError::InvalidInput(other.to_string()),
        }
    }
}

impl From<export::DossierError> for DilutioError {
    fn from(e: export::DossierError) -> Self {
        match e {
            export::DossierError::Json(e) => DilutioError::SerializationError(e.to_string()),
            other => DilutioError::IssuanceBlocked(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for DilutioError {
    fn from(e: serde_json::Error) -> Self {
        DilutioError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DilutioError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DilutioError::SessionError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Stateless Engine Functions (exported to FFI)
// =========================================================================

/// Standardize the base paste.
#[uniffi::export]
pub fn standardize_base(input: FfiExtractInput) -> FfiBaseResult {
    standardize(&input.into()).into()
}

/// Standardize and fraction in one pass with default settings.
#[uniffi::export]
pub fn calculate_dosing(input: FfiExtractInput, patients: Vec<FfiPrescription>) -> FfiCalculation {
    let patients: Vec<PatientPrescription> = patients.into_iter().map(|p| p.into()).collect();
    calculate(&input.into(), &patients, &CalcSettings::default()).into()
}

/// Start a new dosing session with one blank patient row and a fresh batch number.
#[uniffi::export]
pub fn new_session() -> Arc<DilutioSession> {
    Arc::new(DilutioSession::with_settings(CalcSettings::default()))
}

/// Start a session with settings loaded from JSON.
#[uniffi::export]
pub fn new_session_with_settings(settings_json: String) -> Result<Arc<DilutioSession>, DilutioError> {
    let settings = CalcSettings::from_json(&settings_json)?;
    Ok(Arc::new(DilutioSession::with_settings(settings)))
}

// =========================================================================
// Session Object
// =========================================================================

struct SessionState {
    roster: PrescriptionRoster,
    traceability: Traceability,
    settings: CalcSettings,
}

/// Thread-safe session wrapper for FFI.
///
/// Holds the prescription roster and batch identity; every calculation is
/// recomputed from the current snapshot.
#[derive(uniffi::Object)]
pub struct DilutioSession {
    state: Arc<Mutex<SessionState>>,
}

impl DilutioSession {
    fn with_settings(settings: CalcSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                roster: PrescriptionRoster::new(),
                traceability: Traceability::now(""),
                settings,
            })),
        }
    }
}

#[uniffi::export]
impl DilutioSession {
    // =========================================================================
    // Roster Operations
    // =========================================================================

    /// Append a blank patient row, returning its id.
    pub fn add_patient(&self) -> Result<String, DilutioError> {
        let mut state = self.state.lock()?;
        Ok(state.roster.add())
    }

    /// Remove a patient row.
    pub fn remove_patient(&self, id: String) -> Result<(), DilutioError> {
        let mut state = self.state.lock()?;
        state
            .roster
            .remove(&id)
            .map(|_| ())
            .ok_or(DilutioError::NotFound(id))
    }

    /// Edit one field of a patient row. Rejected edits keep the prior value.
    pub fn update_patient(
        &self,
        id: String,
        field: FfiPrescriptionField,
        value: String,
    ) -> Result<(), DilutioError> {
        let mut state = self.state.lock()?;
        state.roster.update(&id, field.into(), &value)?;
        Ok(())
    }

    /// Current patient rows in display order.
    pub fn patients(&self) -> Result<Vec<FfiPrescription>, DilutioError> {
        let state = self.state.lock()?;
        Ok(state.roster.iter().cloned().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Traceability
    // =========================================================================

    /// Set the responsible technician.
    pub fn set_technician(&self, technician: String) -> Result<(), DilutioError> {
        let mut state = self.state.lock()?;
        state.traceability.technician = technician;
        Ok(())
    }

    /// Batch number stamped when the session started.
    pub fn batch_number(&self) -> Result<String, DilutioError> {
        let state = self.state.lock()?;
        Ok(state.traceability.batch_number.clone())
    }

    /// Document date stamped when the session started.
    pub fn document_date(&self) -> Result<String, DilutioError> {
        let state = self.state.lock()?;
        Ok(state.traceability.date.clone())
    }

    // =========================================================================
    // Calculation & Export
    // =========================================================================

    /// Recompute standardization and fractioning for the current roster.
    pub fn calculate(&self, input: FfiExtractInput) -> Result<FfiCalculation, DilutioError> {
        let state = self.state.lock()?;
        let calc = calculate(&input.into(), state.roster.as_slice(), &state.settings);
        Ok(calc.into())
    }

    /// Build a dossier and export it as JSON for the document renderer.
    pub fn export_dossier_json(
        &self,
        kind: FfiDossierKind,
        input: FfiExtractInput,
    ) -> Result<String, DilutioError> {
        let state = self.state.lock()?;
        let input: ExtractInput = input.into();
        let calc = calculate(&input, state.roster.as_slice(), &state.settings);
        let dossier = Dossier::build(
            kind.into(),
            &state.traceability,
            &input,
            state.roster.as_slice(),
            &calc,
        )?;
        Ok(dossier.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe calculation mode.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiCalcMode {
    Mass,
    Concentration,
}

impl From<FfiCalcMode> for CalcMode {
    fn from(mode: FfiCalcMode) -> Self {
        match mode {
            FfiCalcMode::Mass => CalcMode::Mass,
            FfiCalcMode::Concentration => CalcMode::Concentration,
        }
    }
}

/// FFI-safe extract input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExtractInput {
    pub extract_type: String,
    pub calc_mode: FfiCalcMode,
    pub m_extrato: String,
    pub p_coa: String,
    pub c_base: String,
    pub v_final: String,
}

impl From<FfiExtractInput> for ExtractInput {
    fn from(input: FfiExtractInput) -> Self {
        ExtractInput {
            extract_type: input.extract_type,
            calc_mode: input.calc_mode.into(),
            m_extrato: input.m_extrato,
            p_coa: input.p_coa,
            c_base: input.c_base,
            v_final: input.v_final,
        }
    }
}

/// FFI-safe base result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBaseResult {
    pub concentration: f64,
    pub v_final_base: f64,
    pub is_valid: bool,
    pub issues: Vec<String>,
}

impl From<BaseCalculationResult> for FfiBaseResult {
    fn from(base: BaseCalculationResult) -> Self {
        Self {
            concentration: base.concentration,
            v_final_base: base.v_final_base,
            is_valid: base.is_valid,
            issues: base.issues.iter().map(|i| i.to_string()).collect(),
        }
    }
}

/// FFI-safe prescription row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub id: String,
    pub name: String,
    pub c_alvo: String,
    pub v_frasco: String,
}

impl From<PatientPrescription> for FfiPrescription {
    fn from(p: PatientPrescription) -> Self {
        Self {
            id: p.id,
            name: p.name,
            c_alvo: p.c_alvo,
            v_frasco: p.v_frasco,
        }
    }
}

impl From<FfiPrescription> for PatientPrescription {
    fn from(p: FfiPrescription) -> Self {
        PatientPrescription {
            id: p.id,
            name: p.name,
            c_alvo: p.c_alvo,
            v_frasco: p.v_frasco,
        }
    }
}

/// FFI-safe editable field.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiPrescriptionField {
    Name,
    CAlvo,
    VFrasco,
}

impl From<FfiPrescriptionField> for PrescriptionField {
    fn from(field: FfiPrescriptionField) -> Self {
        match field {
            FfiPrescriptionField::Name => PrescriptionField::Name,
            FfiPrescriptionField::CAlvo => PrescriptionField::CAlvo,
            FfiPrescriptionField::VFrasco => PrescriptionField::VFrasco,
        }
    }
}

/// FFI-safe row outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiRowStatus {
    Ready,
    Incomplete,
    Invalid,
}

impl From<RowStatus> for FfiRowStatus {
    fn from(status: RowStatus) -> Self {
        match status {
            RowStatus::Ready => FfiRowStatus::Ready,
            RowStatus::Incomplete => FfiRowStatus::Incomplete,
            RowStatus::Invalid => FfiRowStatus::Invalid,
        }
    }
}

/// FFI-safe patient result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientResult {
    pub id: String,
    pub aliquota_necessaria: f64,
    pub status: FfiRowStatus,
    pub is_valid: bool,
    pub error: Option<String>,
}

impl From<PatientCalculationResult> for FfiPatientResult {
    fn from(r: PatientCalculationResult) -> Self {
        Self {
            id: r.id,
            aliquota_necessaria: r.aliquota_necessaria,
            status: r.status.into(),
            is_valid: r.is_valid,
            error: r.error.map(|e| e.to_string()),
        }
    }
}

/// FFI-safe combined calculation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCalculation {
    pub base: FfiBaseResult,
    pub patients: Vec<FfiPatientResult>,
    pub total_aliquota_required: f64,
    pub base_paste_sufficient: bool,
    pub has_errors: bool,
    pub issue: Option<String>,
    pub base_issuable: bool,
    pub full_issuable: bool,
}

impl From<Calculation> for FfiCalculation {
    fn from(calc: Calculation) -> Self {
        let base_issuable = calc.base_issuable();
        let full_issuable = calc.full_issuable();
        Self {
            base: calc.base.into(),
            patients: calc.fraction.results.into_iter().map(|r| r.into()).collect(),
            total_aliquota_required: calc.fraction.total_aliquota_required,
            base_paste_sufficient: calc.fraction.base_paste_sufficient,
            has_errors: calc.fraction.has_errors,
            issue: calc.fraction.issue.map(|i| i.to_string()),
            base_issuable,
            full_issuable,
        }
    }
}

/// FFI-safe dossier kind.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiDossierKind {
    Base,
    Full,
}

impl From<FfiDossierKind> for DossierKind {
    fn from(kind: FfiDossierKind) -> Self {
        match kind {
            FfiDossierKind::Base => DossierKind::Base,
            FfiDossierKind::Full => DossierKind::Full,
        }
    }
}
