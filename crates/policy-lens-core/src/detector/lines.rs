//! Line-based duplicate pass.
//!
//! Lines are normalized (whitespace collapsed) and filtered before comparison:
//! - fewer than `min_line_length` characters → dropped
//! - containing any exclusion term → dropped, even if it also carries a benefit
//!   keyword (conservative filter, accepted precision/recall tradeoff)

use std::collections::{BTreeMap, BTreeSet};

use strsim::normalized_levenshtein;

use crate::models::{normalize_line, ContractText, DuplicateFinding, FindingKind, MatchBasis};

use super::{finding, truncate_fragment};

/// Filtered lines of one contract.
pub(super) struct LineIndex {
    source_index: usize,
    /// Lines seen a second time or more, with their occurrence count
    repeated: BTreeMap<String, usize>,
    /// Distinct kept lines
    distinct: BTreeSet<String>,
}

impl LineIndex {
    pub(super) fn build(contract: &ContractText, min_len: usize, exclusions: &[String]) -> Self {
        let mut seen = BTreeSet::new();
        let mut repeated = BTreeMap::new();

        for line in contract.lines() {
            let line = normalize_line(line);
            if !is_candidate(&line, min_len, exclusions) {
                continue;
            }
            if !seen.insert(line.clone()) {
                *repeated.entry(line).or_insert(1) += 1;
            }
        }

        Self {
            source_index: contract.source_index,
            repeated,
            distinct: seen,
        }
    }

    /// One internal finding per line that occurs more than once.
    pub(super) fn internal_findings(&self, max_len: usize) -> Vec<DuplicateFinding> {
        self.repeated
            .iter()
            .map(|(line, occurrences)| {
                finding(
                    FindingKind::Internal,
                    vec![self.source_index],
                    line.clone(),
                    format!(
                        "Contract {} repeats the line '{}' {} times",
                        self.source_index,
                        truncate_fragment(line, max_len),
                        occurrences
                    ),
                    MatchBasis::Line,
                )
            })
            .collect()
    }
}

/// Whether a normalized line takes part in comparisons.
pub(super) fn is_candidate(line: &str, min_len: usize, exclusions: &[String]) -> bool {
    line.chars().count() >= min_len && !exclusions.iter().any(|term| line.contains(term.as_str()))
}

/// Lines shared by two contracts, plus near-duplicates when a threshold is set.
pub(super) fn cross_findings(
    a: &LineIndex,
    b: &LineIndex,
    near_threshold: Option<f64>,
    max_len: usize,
) -> Vec<DuplicateFinding> {
    let (low, high) = ordered_indices(a.source_index, b.source_index);

    let mut findings: Vec<DuplicateFinding> = a
        .distinct
        .intersection(&b.distinct)
        .map(|line| {
            finding(
                FindingKind::CrossContract,
                vec![low, high],
                line.clone(),
                format!(
                    "Line '{}' appears in both contract {} and contract {}",
                    truncate_fragment(line, max_len),
                    low,
                    high
                ),
                MatchBasis::Line,
            )
        })
        .collect();

    if let Some(threshold) = near_threshold {
        for line_a in a.distinct.difference(&b.distinct) {
            for line_b in b.distinct.difference(&a.distinct) {
                let similarity = normalized_levenshtein(line_a, line_b);
                if similarity < threshold {
                    continue;
                }
                // Lines listed in contract order, fragment independent of pair order
                let (line_low, line_high) = if a.source_index <= b.source_index {
                    (line_a, line_b)
                } else {
                    (line_b, line_a)
                };
                let fragment = line_a.min(line_b).clone();
                findings.push(finding(
                    FindingKind::CrossContract,
                    vec![low, high],
                    fragment,
                    format!(
                        "Similar lines in contract {} and contract {} ({:.0}% alike): '{}' / '{}'",
                        low,
                        high,
                        similarity * 100.0,
                        truncate_fragment(line_low, max_len),
                        truncate_fragment(line_high, max_len)
                    ),
                    MatchBasis::NearLine,
                ));
            }
        }
    }

    findings
}

fn ordered_indices(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
