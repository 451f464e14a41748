//! Analysis engine coordinating detector, scorer and summary for one request.
//!
//! Pipeline: Extracted texts → ContractText batch → Duplicate detection (whole batch)
//!           → per contract: Summary + Scoring → AnalysisReport

use tracing::info;

use crate::catalog::ReferenceCatalog;
use crate::config::{ConfigResult, IntakeConfig};
use crate::detector::DuplicateDetector;
use crate::export::{AnalysisReport, ContractAnalysis};
use crate::models::{ContractText, DuplicateReport, Preference, ScoreEntry};
use crate::scorer::{apply_ceiling, Scorer, ScoringConfig};
use crate::summary::{summarize, ContractSummary, SummaryConfig};

/// Validated configuration ready to analyze contracts.
pub struct AnalysisEngine {
    catalog: ReferenceCatalog,
    scoring: ScoringConfig,
    detector: DuplicateDetector,
    summary: SummaryConfig,
}

impl AnalysisEngine {
    /// Validate the configuration and build the engine.
    pub fn new(config: IntakeConfig) -> ConfigResult<Self> {
        let catalog = config.validate()?;
        info!(
            providers = catalog.len(),
            rules = config.scoring.rules.len(),
            keywords = config.detector.keywords.len(),
            "analysis engine ready"
        );
        Ok(Self {
            catalog,
            scoring: config.scoring,
            detector: DuplicateDetector::new(config.detector),
            summary: config.summary,
        })
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Duplicate findings over the whole batch.
    pub fn detect(&self, contracts: &[ContractText]) -> DuplicateReport {
        self.detector.detect(contracts)
    }

    /// Uncapped ranking for one contract.
    pub fn score(&self, contract: &ContractText, preference: Preference) -> Vec<ScoreEntry> {
        Scorer::new(self.catalog.providers(), &self.scoring).score(contract, preference)
    }

    /// Ranking with the configured display ceiling applied, if any.
    pub fn score_for_display(
        &self,
        contract: &ContractText,
        preference: Preference,
    ) -> Vec<ScoreEntry> {
        let ranking = self.score(contract, preference);
        match self.scoring.display_ceiling {
            Some(ceiling) => apply_ceiling(ranking, ceiling),
            None => ranking,
        }
    }

    pub fn summarize(&self, contract: &ContractText) -> ContractSummary {
        summarize(contract, &self.summary)
    }

    /// Run the full analysis over extracted texts, in upload order.
    pub fn analyze<S: AsRef<str>>(&self, texts: &[S], preference: Preference) -> AnalysisReport {
        let contracts = ContractText::batch(texts);

        // Cross-contract pass needs the full batch
        let duplicates = self.detect(&contracts);

        let analyses: Vec<ContractAnalysis> = contracts
            .iter()
            .map(|contract| {
                let ranking = self.score_for_display(contract, preference);
                ContractAnalysis {
                    source_index: contract.source_index,
                    fingerprint: contract.fingerprint(),
                    char_count: contract.char_count(),
                    summary: self.summarize(contract),
                    recommended: ranking.first().map(|e| e.provider_name.clone()),
                    ranking,
                }
            })
            .collect();

        info!(
            contracts = analyses.len(),
            findings = duplicates.findings.len(),
            preference = %preference,
            "analysis complete"
        );

        AnalysisReport::new(preference, analyses, duplicates)
    }
}

/// Validate `config` and analyze one batch with it.
pub fn analyze<S: AsRef<str>>(
    texts: &[S],
    preference: Preference,
    config: &IntakeConfig,
) -> ConfigResult<AnalysisReport> {
    Ok(AnalysisEngine::new(config.clone())?.analyze(texts, preference))
}
