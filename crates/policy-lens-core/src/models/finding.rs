//! Duplicate-coverage findings.

use serde::{Deserialize, Serialize};

/// Where a repeated benefit was found.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FindingKind {
    /// Repeated inside one contract
    Internal,
    /// Shared by two contracts
    CrossContract,
}

impl FindingKind {
    /// Stable lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::Internal => "internal",
            FindingKind::CrossContract => "cross_contract",
        }
    }
}

/// Which detection strategy produced a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchBasis {
    /// Identical normalized line
    Line,
    /// Lines above the near-duplicate similarity threshold
    NearLine,
    /// Benefit keyword presence
    Keyword,
}

/// One detected repetition of a benefit mention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuplicateFinding {
    /// Internal or cross-contract
    pub kind: FindingKind,
    /// One 1-based index for internal findings, two (ascending) for cross-contract
    pub contract_indices: Vec<usize>,
    /// The repeated line or keyword
    pub matched_fragment: String,
    /// Sentence suitable for display
    pub human_explanation: String,
    /// Strategy that produced the finding
    pub basis: MatchBasis,
}

impl DuplicateFinding {
    /// First (lowest) contract index.
    pub fn first_index(&self) -> usize {
        self.contract_indices.first().copied().unwrap_or(0)
    }

    /// Second contract index, for cross-contract findings.
    pub fn second_index(&self) -> Option<usize> {
        self.contract_indices.get(1).copied()
    }

    /// Whether this finding concerns the given contract.
    pub fn involves(&self, source_index: usize) -> bool {
        self.contract_indices.contains(&source_index)
    }
}

/// Findings of one detection run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DuplicateReport {
    /// Ordered, deduplicated findings
    pub findings: Vec<DuplicateFinding>,
    /// Deduplicated matched fragments, sorted
    pub fragments: Vec<String>,
}

impl DuplicateReport {
    /// No duplicates detected.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings of the given kind.
    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &DuplicateFinding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}
