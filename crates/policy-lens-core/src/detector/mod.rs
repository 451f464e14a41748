//! Duplicate-coverage detection across uploaded contracts.
//!
//! Two strategies share one interface:
//! - Line-based: repeated boilerplate-free lines, within and across contracts
//! - Keyword-based: benefit keywords repeated within a contract or present in two
//!
//! Pipeline: Contract texts (full batch) → Strategy passes → Ordering/dedup → Report

mod keywords;
mod lines;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ContractText, DuplicateFinding, DuplicateReport, FindingKind, MatchBasis};

use lines::LineIndex;

/// Minimum characters for a line to be compared.
pub const DEFAULT_MIN_LINE_LENGTH: usize = 15;

/// Fragment length used in explanations.
pub const DEFAULT_MAX_FRAGMENT_LENGTH: usize = 60;

/// Which detection passes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    LineBased,
    KeywordBased,
    Both,
}

impl DetectionStrategy {
    fn uses_lines(self) -> bool {
        matches!(self, DetectionStrategy::LineBased | DetectionStrategy::Both)
    }

    fn uses_keywords(self) -> bool {
        matches!(self, DetectionStrategy::KeywordBased | DetectionStrategy::Both)
    }
}

impl Default for DetectionStrategy {
    fn default() -> Self {
        DetectionStrategy::Both
    }
}

/// Detector settings. Exclusion terms and keywords come from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Passes to run
    pub strategy: DetectionStrategy,
    /// Lines with fewer characters are ignored
    pub min_line_length: usize,
    /// Lines containing any of these terms are ignored (postal boxes, brand names, dates...)
    pub exclusion_terms: Vec<String>,
    /// Benefit vocabulary for the keyword pass
    pub keywords: Vec<String>,
    /// Fragment length shown in explanations
    pub max_fragment_length: usize,
    /// Report similar (not identical) lines across contracts at or above this similarity.
    /// Compares every candidate line of one contract with every line of the other,
    /// so the pass is quadratic in the number of lines.
    pub near_duplicate_threshold: Option<f64>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            strategy: DetectionStrategy::Both,
            min_line_length: DEFAULT_MIN_LINE_LENGTH,
            exclusion_terms: Vec::new(),
            keywords: Vec::new(),
            max_fragment_length: DEFAULT_MAX_FRAGMENT_LENGTH,
            near_duplicate_threshold: None,
        }
    }
}

impl DetectorConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_fragment_length == 0 {
            return Err("max_fragment_length must be greater than 0".to_string());
        }
        if let Some(threshold) = self.near_duplicate_threshold {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(format!(
                    "near_duplicate_threshold must be in (0, 1], got {}",
                    threshold
                ));
            }
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err("keywords must not contain empty entries".to_string());
        }
        if self.exclusion_terms.iter().any(|t| t.trim().is_empty()) {
            return Err("exclusion_terms must not contain empty entries".to_string());
        }
        Ok(())
    }
}

/// Duplicate detector over a full batch of contracts.
pub struct DuplicateDetector {
    config: DetectorConfig,
    exclusions: Vec<String>,
    keywords: Vec<String>,
}

impl DuplicateDetector {
    /// Create a detector; terms are lowercased once here.
    pub fn new(config: DetectorConfig) -> Self {
        // Exclusion terms keep their surrounding spaces: "mai " must not match "semaine"
        let exclusions = config
            .exclusion_terms
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.to_lowercase())
            .collect();
        let keywords = unique_keywords(&config.keywords);
        Self {
            config,
            exclusions,
            keywords,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect duplicates. Never fails; degenerate input yields an empty report.
    pub fn detect(&self, contracts: &[ContractText]) -> DuplicateReport {
        let mut findings = Vec::new();

        if self.config.strategy.uses_lines() {
            let indexes: Vec<LineIndex> = contracts
                .iter()
                .map(|c| LineIndex::build(c, self.config.min_line_length, &self.exclusions))
                .collect();

            for index in &indexes {
                findings.extend(index.internal_findings(self.config.max_fragment_length));
            }
            for (i, a) in indexes.iter().enumerate() {
                for b in &indexes[i + 1..] {
                    findings.extend(lines::cross_findings(
                        a,
                        b,
                        self.config.near_duplicate_threshold,
                        self.config.max_fragment_length,
                    ));
                }
            }
        }

        if self.config.strategy.uses_keywords() && !self.keywords.is_empty() {
            let counts: Vec<keywords::KeywordCounts> = contracts
                .iter()
                .map(|c| keywords::KeywordCounts::build(c, &self.keywords))
                .collect();

            for count in &counts {
                findings.extend(count.internal_findings(self.config.max_fragment_length));
            }
            for (i, a) in counts.iter().enumerate() {
                for b in &counts[i + 1..] {
                    findings.extend(keywords::cross_findings(
                        a,
                        b,
                        self.config.max_fragment_length,
                    ));
                }
            }
        }

        let findings = order_and_dedup(findings);
        let mut fragments: Vec<String> = findings
            .iter()
            .map(|f| f.matched_fragment.clone())
            .collect();
        fragments.sort();
        fragments.dedup();

        debug!(
            contracts = contracts.len(),
            findings = findings.len(),
            "duplicate detection complete"
        );

        DuplicateReport {
            findings,
            fragments,
        }
    }
}

/// Detect duplicate benefit mentions in a batch of contracts.
pub fn detect_duplicates(
    contracts: &[ContractText],
    config: &DetectorConfig,
) -> Vec<DuplicateFinding> {
    DuplicateDetector::new(config.clone())
        .detect(contracts)
        .findings
}

/// Order by first contract, internal before cross-contract, then second
/// contract, then fragment. Line findings win over keyword findings for the
/// same fragment.
fn order_and_dedup(mut findings: Vec<DuplicateFinding>) -> Vec<DuplicateFinding> {
    findings.sort_by(|a, b| {
        (a.first_index(), a.kind, a.second_index(), &a.matched_fragment, a.basis).cmp(&(
            b.first_index(),
            b.kind,
            b.second_index(),
            &b.matched_fragment,
            b.basis,
        ))
    });
    findings.dedup_by(|later, earlier| {
        later.kind == earlier.kind
            && later.contract_indices == earlier.contract_indices
            && later.matched_fragment == earlier.matched_fragment
    });
    findings
}

/// Build a finding with ascending indices.
fn finding(
    kind: FindingKind,
    mut contract_indices: Vec<usize>,
    matched_fragment: String,
    human_explanation: String,
    basis: MatchBasis,
) -> DuplicateFinding {
    contract_indices.sort_unstable();
    DuplicateFinding {
        kind,
        contract_indices,
        matched_fragment,
        human_explanation,
        basis,
    }
}

/// Truncate to `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_fragment(fragment: &str, max_chars: usize) -> String {
    if fragment.chars().count() <= max_chars {
        return fragment.to_string();
    }
    let mut cut: String = fragment.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

/// Trimmed, lowercased keywords; repeats are dropped, first occurrence wins.
fn unique_keywords(terms: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}
