//! Policy-Lens Core Library
//!
//! Contract intake analysis for Swiss health insurance documents: duplicate
//! coverage detection and provider affinity scoring against a reference catalog.
//!
//! # Architecture
//!
//! ```text
//! Uploaded documents → Text extraction (caller)
//!                              │
//!                  [ContractText batch, 1-based]
//!                              │
//!            ┌─────────────────┼──────────────────┐
//!            │                 │                  │
//!            ▼                 ▼                  ▼
//!     Duplicate Detector  Coverage Scorer   Module Summary
//!     (whole batch)       (per contract)    (per contract)
//!            │                 │                  │
//!            └─────────────────┼──────────────────┘
//!                              ▼
//!                       AnalysisReport
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//!            JSON             CSV            Text
//! ```
//!
//! # Core Principle
//!
//! **Analysis is a pure function of the texts and the configuration.** The
//! catalog and rules are loaded once, validated, and never mutated by a request.
//!
//! # Modules
//!
//! - [`models`]: Domain types (ContractText, ProviderProfile, DuplicateFinding, ScoreEntry)
//! - [`catalog`]: Reference catalog of provider profiles
//! - [`detector`]: Duplicate detector (line-based and keyword-based passes)
//! - [`scorer`]: Coverage scorer (signal rules + preference adjustment)
//! - [`summary`]: Module presence summary (LAMal, LCA, hospitalisation)
//! - [`config`]: TOML/JSON configuration
//! - [`analysis`]: Engine running all of the above over one batch
//! - [`export`]: Report export

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod detector;
pub mod export;
pub mod models;
pub mod scorer;
pub mod summary;

// Re-export commonly used types
pub use analysis::{analyze, AnalysisEngine};
pub use catalog::ReferenceCatalog;
pub use config::{ConfigError, IntakeConfig};
pub use detector::{detect_duplicates, DetectionStrategy, DetectorConfig, DuplicateDetector};
pub use export::{AnalysisReport, ContractAnalysis};
pub use models::{
    ContractText, DuplicateFinding, DuplicateReport, FindingKind, MatchBasis, Preference,
    ProviderProfile, RoomClass, ScoreEntry,
};
pub use scorer::{score_providers, ScoringConfig, ScoringRule};
pub use summary::{summarize, ContractSummary, SummaryConfig};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PolicyLensError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<config::ConfigError> for PolicyLensError {
    fn from(e: config::ConfigError) -> Self {
        PolicyLensError::InvalidConfig(e.to_string())
    }
}

impl From<models::InvalidPreference> for PolicyLensError {
    fn from(e: models::InvalidPreference) -> Self {
        PolicyLensError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for PolicyLensError {
    fn from(e: serde_json::Error) -> Self {
        PolicyLensError::SerializationError(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Build an engine from a TOML configuration document.
#[uniffi::export]
pub fn load_engine(config_toml: String) -> Result<Arc<PolicyLensCore>, PolicyLensError> {
    let config = IntakeConfig::from_toml(&config_toml)?;
    PolicyLensCore::build(config)
}

/// Build an engine from a JSON configuration document.
#[uniffi::export]
pub fn load_engine_json(config_json: String) -> Result<Arc<PolicyLensCore>, PolicyLensError> {
    let config = IntakeConfig::from_json(&config_json)?;
    PolicyLensCore::build(config)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Validated engine shared with the host application.
#[derive(uniffi::Object)]
pub struct PolicyLensCore {
    engine: AnalysisEngine,
}

impl PolicyLensCore {
    fn build(config: IntakeConfig) -> Result<Arc<Self>, PolicyLensError> {
        Ok(Arc::new(Self {
            engine: AnalysisEngine::new(config)?,
        }))
    }
}

#[uniffi::export]
impl PolicyLensCore {
    /// Names of the catalog providers, in tie-break order.
    pub fn provider_names(&self) -> Vec<String> {
        self.engine
            .catalog()
            .providers()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    /// Duplicate findings over a batch of extracted texts (1-based indices).
    pub fn detect_duplicates(&self, texts: Vec<String>) -> Vec<FfiDuplicateFinding> {
        let contracts = ContractText::batch(&texts);
        self.engine
            .detect(&contracts)
            .findings
            .into_iter()
            .map(|f| f.into())
            .collect()
    }

    /// Ranked providers for one contract.
    pub fn score_contract(
        &self,
        text: String,
        preference: String,
    ) -> Result<Vec<FfiScoreEntry>, PolicyLensError> {
        let preference: Preference = preference.parse()?;
        let contract = ContractText::new(1, &text);
        Ok(self
            .engine
            .score_for_display(&contract, preference)
            .into_iter()
            .map(|e| e.into())
            .collect())
    }

    /// Module presence summary for one contract.
    pub fn summarize_contract(&self, text: String) -> FfiContractSummary {
        self.engine.summarize(&ContractText::new(1, &text)).into()
    }

    /// Full analysis of a batch, as a JSON report.
    pub fn analyze_json(
        &self,
        texts: Vec<String>,
        preference: String,
    ) -> Result<String, PolicyLensError> {
        let preference: Preference = preference.parse()?;
        let report = self.engine.analyze(&texts, preference);
        Ok(report.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe duplicate finding.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDuplicateFinding {
    pub kind: String,
    pub contract_indices: Vec<u32>,
    pub matched_fragment: String,
    pub human_explanation: String,
}

impl From<DuplicateFinding> for FfiDuplicateFinding {
    fn from(finding: DuplicateFinding) -> Self {
        Self {
            kind: finding.kind.label().to_string(),
            contract_indices: finding
                .contract_indices
                .iter()
                .map(|i| *i as u32)
                .collect(),
            matched_fragment: finding.matched_fragment,
            human_explanation: finding.human_explanation,
        }
    }
}

/// FFI-safe score entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScoreEntry {
    pub provider_name: String,
    pub score: u32,
    pub matched_rules: Vec<String>,
}

impl From<ScoreEntry> for FfiScoreEntry {
    fn from(entry: ScoreEntry) -> Self {
        Self {
            provider_name: entry.provider_name,
            score: entry.score,
            matched_rules: entry.matched_rules,
        }
    }
}

/// FFI-safe contract summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiContractSummary {
    pub detected_sections: Vec<String>,
    pub note: u32,
    pub scale: u32,
    pub missing_required: Vec<String>,
}

impl From<ContractSummary> for FfiContractSummary {
    fn from(summary: ContractSummary) -> Self {
        Self {
            detected_sections: summary
                .sections
                .iter()
                .filter(|s| s.detected)
                .map(|s| s.label.clone())
                .collect(),
            note: summary.note,
            scale: summary.scale,
            missing_required: summary.missing_required,
        }
    }
}
