//! Keyword-based duplicate pass over the benefit vocabulary.

use crate::models::{ContractText, DuplicateFinding, FindingKind, MatchBasis};

use super::{finding, truncate_fragment};

/// Occurrence count of every vocabulary keyword in one contract.
pub(super) struct KeywordCounts {
    source_index: usize,
    /// (keyword, occurrences) in vocabulary order
    counts: Vec<(String, usize)>,
}

impl KeywordCounts {
    pub(super) fn build(contract: &ContractText, keywords: &[String]) -> Self {
        let counts = keywords
            .iter()
            .map(|kw| (kw.clone(), contract.count(kw)))
            .collect();
        Self {
            source_index: contract.source_index,
            counts,
        }
    }

    fn present(&self) -> impl Iterator<Item = &str> {
        self.counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(kw, _)| kw.as_str())
    }

    fn has(&self, keyword: &str) -> bool {
        self.counts.iter().any(|(kw, n)| kw == keyword && *n > 0)
    }

    /// Keywords mentioned more than once.
    pub(super) fn internal_findings(&self, max_len: usize) -> Vec<DuplicateFinding> {
        self.counts
            .iter()
            .filter(|(_, n)| *n > 1)
            .map(|(kw, n)| {
                finding(
                    FindingKind::Internal,
                    vec![self.source_index],
                    kw.clone(),
                    format!(
                        "Benefit '{}' is mentioned {} times in contract {}",
                        truncate_fragment(kw, max_len),
                        n,
                        self.source_index
                    ),
                    MatchBasis::Keyword,
                )
            })
            .collect()
    }
}

/// Keywords present in both contracts.
pub(super) fn cross_findings(
    a: &KeywordCounts,
    b: &KeywordCounts,
    max_len: usize,
) -> Vec<DuplicateFinding> {
    let (low, high) = if a.source_index <= b.source_index {
        (a.source_index, b.source_index)
    } else {
        (b.source_index, a.source_index)
    };

    a.present()
        .filter(|kw| b.has(kw))
        .map(|kw| {
            finding(
                FindingKind::CrossContract,
                vec![low, high],
                kw.to_string(),
                format!(
                    "Benefit '{}' detected in both contract {} and contract {}",
                    truncate_fragment(kw, max_len),
                    low,
                    high
                ),
                MatchBasis::Keyword,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vec<String> {
        vec![
            "dentaire".into(),
            "hospitalisation".into(),
            "check-up".into(),
        ]
    }

    #[test]
    fn test_internal_keyword_repetition() {
        let contract = ContractText::new(1, "Soins dentaire\nPlafond dentaire 5000");
        let counts = KeywordCounts::build(&contract, &vocabulary());
        let findings = counts.internal_findings(60);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].matched_fragment, "dentaire");
        assert_eq!(findings[0].contract_indices, vec![1]);
        assert!(findings[0].human_explanation.contains("2 times"));
    }

    #[test]
    fn test_single_mention_is_not_internal() {
        let contract = ContractText::new(1, "hospitalisation en division commune");
        let counts = KeywordCounts::build(&contract, &vocabulary());
        assert!(counts.internal_findings(60).is_empty());
    }

    #[test]
    fn test_cross_keywords_follow_vocabulary() {
        let a = KeywordCounts::build(
            &ContractText::new(1, "Check-up annuel, hospitalisation"),
            &vocabulary(),
        );
        let b = KeywordCounts::build(
            &ContractText::new(2, "HOSPITALISATION privée, check-up"),
            &vocabulary(),
        );

        let fragments: Vec<String> = cross_findings(&a, &b, 60)
            .into_iter()
            .map(|f| f.matched_fragment)
            .collect();
        assert_eq!(fragments, vec!["hospitalisation", "check-up"]);
    }
}
