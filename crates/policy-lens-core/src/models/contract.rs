//! Extracted contract text.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Plain-text extraction of one uploaded document, lowercased once on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractText {
    /// Lowercased text; lines are separated by `\n`
    pub raw_text: String,
    /// Position in the uploaded batch, 1-based
    pub source_index: usize,
}

impl ContractText {
    /// Create a contract text from extracted content.
    pub fn new(source_index: usize, text: &str) -> Self {
        Self {
            raw_text: text.replace("\r\n", "\n").to_lowercase(),
            source_index,
        }
    }

    /// Build a batch with 1-based indices in input order.
    pub fn batch<S: AsRef<str>>(texts: &[S]) -> Vec<Self> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Self::new(i + 1, text.as_ref()))
            .collect()
    }

    /// Raw lines, unnormalized.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw_text.lines()
    }

    /// Whether `phrase` occurs anywhere in the text (case-insensitive).
    pub fn contains(&self, phrase: &str) -> bool {
        let phrase = phrase.to_lowercase();
        !phrase.is_empty() && self.raw_text.contains(&phrase)
    }

    /// Number of non-overlapping occurrences of `phrase`.
    pub fn count(&self, phrase: &str) -> usize {
        let phrase = phrase.to_lowercase();
        if phrase.is_empty() {
            return 0;
        }
        self.raw_text.matches(&phrase).count()
    }

    /// Character count of the text.
    pub fn char_count(&self) -> usize {
        self.raw_text.chars().count()
    }

    /// Whether the text has no visible content.
    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }

    /// SHA-256 of the text as lowercase hex. Identical uploads share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.raw_text.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Collapse whitespace runs and trim. Input is expected to be lowercase already.
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lowercases() {
        let contract = ContractText::new(1, "Hospitalisation PRIVÉE\r\nDentaire");
        assert_eq!(contract.raw_text, "hospitalisation privée\ndentaire");
        assert_eq!(contract.lines().count(), 2);
    }

    #[test]
    fn test_batch_is_one_based() {
        let batch = ContractText::batch(&["a", "b", "c"]);
        let indices: Vec<usize> = batch.iter().map(|c| c.source_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_contains_and_count() {
        let contract = ContractText::new(1, "Dentaire 5000\nfrais dentaire");
        assert!(contract.contains("DENTAIRE"));
        assert_eq!(contract.count("dentaire"), 2);
        assert!(!contract.contains(""));
        assert_eq!(contract.count(""), 0);
    }

    #[test]
    fn test_fingerprint_stable() {
        let a = ContractText::new(1, "LAMal base");
        let b = ContractText::new(2, "lamal BASE");
        let c = ContractText::new(3, "lamal");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line("  a   b \t c  "), "a b c");
        assert_eq!(normalize_line("   "), "");
    }
}
