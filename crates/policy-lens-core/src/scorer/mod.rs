//! Preference-weighted coverage scoring.
//!
//! Pipeline: Zero scores → Signal rules (additive) → Preference adjustment → Stable rank
//!
//! Scores are never normalized here; capping for display is [`apply_ceiling`].

mod preference;
mod rules;

pub use preference::*;
pub use rules::*;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ContractText, Preference, ProviderProfile, ScoreEntry};

/// Rules and policies for the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Signal rules, applied in order
    pub rules: Vec<ScoringRule>,
    /// Adjustment for the declared preference
    pub preference: PreferencePolicy,
    /// Optional ceiling applied by the report layer
    pub display_ceiling: Option<u32>,
}

impl ScoringConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let mut names = HashSet::new();
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err("scoring rule name must not be empty".to_string());
            }
            if !names.insert(rule.name.as_str()) {
                return Err(format!("duplicate scoring rule: {}", rule.name));
            }
            if rule.trigger.is_empty() {
                return Err(format!("scoring rule {} has no trigger phrase", rule.name));
            }
            let phrases = rule.trigger.all_of.iter().chain(rule.trigger.any_of.iter());
            if phrases.into_iter().any(|p| p.trim().is_empty()) {
                return Err(format!("scoring rule {} has an empty phrase", rule.name));
            }
        }
        Ok(())
    }
}

/// Scorer over one catalog and rule set.
pub struct Scorer<'a> {
    providers: &'a [ProviderProfile],
    config: &'a ScoringConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(providers: &'a [ProviderProfile], config: &'a ScoringConfig) -> Self {
        Self { providers, config }
    }

    /// Rank providers for one contract, highest score first. Ties keep catalog order.
    pub fn score(&self, contract: &ContractText, preference: Preference) -> Vec<ScoreEntry> {
        let mut entries: Vec<ScoreEntry> = self
            .providers
            .iter()
            .map(|p| ScoreEntry::new(&p.name))
            .collect();

        for rule in &self.config.rules {
            if !rule.trigger.fires(contract) {
                continue;
            }
            let mut credited = 0;
            for (provider, entry) in self.providers.iter().zip(entries.iter_mut()) {
                if rule.predicate.matches(provider) {
                    entry.credit(&rule.name, rule.points);
                    credited += 1;
                }
            }
            debug!(
                contract = contract.source_index,
                rule = %rule.name,
                credited,
                "scoring rule fired"
            );
        }

        self.config
            .preference
            .apply(preference, self.providers, &mut entries);

        // Stable: equal scores keep catalog insertion order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
    }

    /// Top-ranked provider, if the catalog is not empty.
    pub fn recommend(&self, contract: &ContractText, preference: Preference) -> Option<ScoreEntry> {
        self.score(contract, preference).into_iter().next()
    }
}

/// Rank `catalog` providers by affinity with one contract.
pub fn score_providers(
    contract: &ContractText,
    preference: Preference,
    catalog: &[ProviderProfile],
    config: &ScoringConfig,
) -> Vec<ScoreEntry> {
    Scorer::new(catalog, config).score(contract, preference)
}

/// Clamp every score to `ceiling`. Order is preserved since clamping is monotone.
pub fn apply_ceiling(mut entries: Vec<ScoreEntry>, ceiling: u32) -> Vec<ScoreEntry> {
    for entry in &mut entries {
        entry.score = entry.score.min(ceiling);
    }
    entries
}
