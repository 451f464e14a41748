//! Analysis report for one intake request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{DuplicateReport, FindingKind, Preference, ScoreEntry};
use crate::summary::ContractSummary;

/// Report format version.
pub const REPORT_FORMAT_VERSION: &str = "1.0";

/// Results for one uploaded contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractAnalysis {
    /// Position in the upload batch, 1-based
    pub source_index: usize,
    /// SHA-256 of the extracted text; the text itself is not retained
    pub fingerprint: String,
    /// Length of the extracted text in characters
    pub char_count: usize,
    /// Module presence summary
    pub summary: ContractSummary,
    /// Providers ranked by affinity
    pub ranking: Vec<ScoreEntry>,
    /// Top-ranked provider
    pub recommended: Option<String>,
}

/// Full analysis report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub report_id: String,
    pub format_version: String,
    pub generated_at: String,
    pub preference: Preference,
    pub contracts: Vec<ContractAnalysis>,
    pub duplicates: DuplicateReport,
}

impl AnalysisReport {
    /// Create a report with a fresh id and timestamp.
    pub fn new(
        preference: Preference,
        contracts: Vec<ContractAnalysis>,
        duplicates: DuplicateReport,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4().to_string(),
            format_version: REPORT_FORMAT_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            preference,
            contracts,
            duplicates,
        }
    }

    /// Contracts uploaded more than once (same fingerprint), as index groups.
    pub fn identical_uploads(&self) -> Vec<Vec<usize>> {
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for contract in &self.contracts {
            match groups.iter_mut().find(|(fp, _)| *fp == contract.fingerprint) {
                Some((_, indices)) => indices.push(contract.source_index),
                None => groups.push((contract.fingerprint.clone(), vec![contract.source_index])),
            }
        }
        groups
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(_, indices)| indices)
            .collect()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV: one row per ranking entry, then one row per finding.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("report_id,record,contracts,subject,score,detail\n");

        for contract in &self.contracts {
            for entry in &contract.ranking {
                csv.push_str(&format!(
                    "{},score,{},{},{},{}\n",
                    escape_csv(&self.report_id),
                    contract.source_index,
                    escape_csv(&entry.provider_name),
                    entry.score,
                    escape_csv(&entry.matched_rules.join(";")),
                ));
            }
        }

        for finding in &self.duplicates.findings {
            let indices: Vec<String> = finding
                .contract_indices
                .iter()
                .map(|i| i.to_string())
                .collect();
            csv.push_str(&format!(
                "{},{},{},{},,{}\n",
                escape_csv(&self.report_id),
                finding.kind.label(),
                indices.join("-"),
                escape_csv(&finding.matched_fragment),
                escape_csv(&finding.human_explanation),
            ));
        }

        csv
    }

    /// Human-readable digest.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Analysis {} ({}), preference: {}\n",
            self.report_id, self.generated_at, self.preference
        ));

        for contract in &self.contracts {
            let summary = &contract.summary;
            out.push_str(&format!(
                "\nContract {}: note {}/{}\n",
                contract.source_index, summary.note, summary.scale
            ));
            for section in &summary.sections {
                out.push_str(&format!(
                    "  {} {}\n",
                    if section.detected { "[x]" } else { "[ ]" },
                    section.label
                ));
            }
            for label in &summary.missing_required {
                out.push_str(&format!("  warning: no {} element detected\n", label));
            }
            if let Some(recommended) = &contract.recommended {
                out.push_str(&format!("  recommended provider: {}\n", recommended));
            }
            for entry in contract.ranking.iter().take(3) {
                out.push_str(&format!("    {:<16} {}\n", entry.provider_name, entry.score));
            }
        }

        for group in self.identical_uploads() {
            let indices: Vec<String> = group.iter().map(|i| i.to_string()).collect();
            out.push_str(&format!(
                "\nContracts {} have identical content\n",
                indices.join(", ")
            ));
        }

        if self.duplicates.is_empty() {
            out.push_str("\nNo duplicate benefits detected.\n");
        } else {
            let cross = self
                .duplicates
                .of_kind(FindingKind::CrossContract)
                .count();
            out.push_str(&format!(
                "\nDuplicate benefits ({} across contracts):\n",
                cross
            ));
            for finding in &self.duplicates.findings {
                out.push_str(&format!("  - {}\n", finding.human_explanation));
            }
        }

        out
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
