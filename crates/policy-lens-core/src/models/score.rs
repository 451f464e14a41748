//! Provider ranking models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The user's declared goal for their coverage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Preference {
    /// Lower the premium
    ReduceCost,
    /// Get better benefits
    ImproveBenefits,
    /// No stated goal
    Undecided,
}

/// Preference value outside the recognized set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid preference: {0}")]
pub struct InvalidPreference(pub String);

impl Preference {
    /// Stable kebab-case label.
    pub fn label(&self) -> &'static str {
        match self {
            Preference::ReduceCost => "reduce-cost",
            Preference::ImproveBenefits => "improve-benefits",
            Preference::Undecided => "undecided",
        }
    }
}

impl FromStr for Preference {
    type Err = InvalidPreference;

    /// Accepts kebab/snake/camel case labels and the French form labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Emoji prefixes of the form labels are dropped with the punctuation.
        let key = s
            .to_lowercase()
            .replace(['-', '_'], " ")
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match key.as_str() {
            "reducecost" | "reduce cost" | "réduire les coûts" | "reduire les couts" => {
                Ok(Preference::ReduceCost)
            }
            "improvebenefits" | "improve benefits" | "améliorer les prestations"
            | "ameliorer les prestations" => Ok(Preference::ImproveBenefits),
            "undecided" | "je ne sais pas encore" => Ok(Preference::Undecided),
            _ => Err(InvalidPreference(s.to_string())),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One provider's affinity score for one contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Provider name from the catalog
    pub provider_name: String,
    /// Accumulated points
    pub score: u32,
    /// Rules and adjustments that credited this provider, in application order
    pub matched_rules: Vec<String>,
}

impl ScoreEntry {
    /// Create a zero entry.
    pub fn new(provider_name: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            score: 0,
            matched_rules: Vec::new(),
        }
    }

    /// Add points on behalf of a rule.
    pub fn credit(&mut self, rule: &str, points: u32) {
        self.score = self.score.saturating_add(points);
        self.matched_rules.push(rule.to_string());
    }
}
