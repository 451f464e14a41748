//! Preference-based adjustment applied after the base rules.

use serde::{Deserialize, Serialize};

use crate::models::{Preference, ProviderProfile, ScoreEntry};

pub const REDUCE_COST_RULE: &str = "preference:reduce-cost";
pub const IMPROVE_BENEFITS_RULE: &str = "preference:improve-benefits";

/// Bonuses granted for the user's declared preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencePolicy {
    /// Bonus for the lowest-tariff provider(s) under `ReduceCost`
    pub reduce_cost_bonus: u32,
    /// Provider credited under `ReduceCost` when no provider publishes a tariff
    pub low_cost_fallback: Option<String>,
    /// Bonus for every provider under `ImproveBenefits`
    pub improve_benefits_bonus: u32,
}

impl Default for PreferencePolicy {
    fn default() -> Self {
        Self {
            reduce_cost_bonus: 3,
            low_cost_fallback: None,
            improve_benefits_bonus: 1,
        }
    }
}

impl PreferencePolicy {
    /// Apply the adjustment. `entries` must be aligned with `providers`.
    pub fn apply(
        &self,
        preference: Preference,
        providers: &[ProviderProfile],
        entries: &mut [ScoreEntry],
    ) {
        match preference {
            Preference::ReduceCost => {
                for i in self.low_cost_targets(providers) {
                    entries[i].credit(REDUCE_COST_RULE, self.reduce_cost_bonus);
                }
            }
            Preference::ImproveBenefits => {
                for entry in entries.iter_mut() {
                    entry.credit(IMPROVE_BENEFITS_RULE, self.improve_benefits_bonus);
                }
            }
            Preference::Undecided => {}
        }
    }

    /// Positions of the providers sharing the lowest tariff, or of the
    /// fallback provider when no tariff is known.
    pub fn low_cost_targets(&self, providers: &[ProviderProfile]) -> Vec<usize> {
        match providers.iter().filter_map(|p| p.monthly_tariff).min() {
            Some(lowest) => providers
                .iter()
                .enumerate()
                .filter(|(_, p)| p.monthly_tariff == Some(lowest))
                .map(|(i, _)| i)
                .collect(),
            None => self
                .low_cost_fallback
                .as_deref()
                .and_then(|name| providers.iter().position(|p| p.is_named(name)))
                .into_iter()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn providers(tariffs: &[(&str, Option<u32>)]) -> Vec<ProviderProfile> {
        tariffs
            .iter()
            .map(|(name, tariff)| {
                let mut p = ProviderProfile::new(*name);
                p.monthly_tariff = *tariff;
                p
            })
            .collect()
    }

    fn entries(providers: &[ProviderProfile]) -> Vec<ScoreEntry> {
        providers.iter().map(|p| ScoreEntry::new(&p.name)).collect()
    }

    #[test]
    fn test_reduce_cost_credits_lowest_tariff_only() {
        let providers = providers(&[("Sanitas", Some(390)), ("Assura", Some(250)), ("CSS", None)]);
        let mut scores = entries(&providers);
        PreferencePolicy::default().apply(Preference::ReduceCost, &providers, &mut scores);

        assert_eq!(scores[0].score, 0);
        assert_eq!(scores[1].score, 3);
        assert_eq!(scores[1].matched_rules, vec![REDUCE_COST_RULE]);
        assert_eq!(scores[2].score, 0);
    }

    #[test]
    fn test_reduce_cost_ties_share_bonus() {
        let providers = providers(&[("A", Some(200)), ("B", Some(300)), ("C", Some(200))]);
        let policy = PreferencePolicy::default();
        assert_eq!(policy.low_cost_targets(&providers), vec![0, 2]);
    }

    #[test]
    fn test_reduce_cost_fallback_without_tariffs() {
        let providers = providers(&[("Helsana", None), ("Assura", None)]);
        let policy = PreferencePolicy {
            low_cost_fallback: Some("assura".into()),
            ..PreferencePolicy::default()
        };
        assert_eq!(policy.low_cost_targets(&providers), vec![1]);

        let no_fallback = PreferencePolicy::default();
        assert!(no_fallback.low_cost_targets(&providers).is_empty());
    }

    #[test]
    fn test_improve_benefits_credits_everyone() {
        let providers = providers(&[("A", None), ("B", None)]);
        let mut scores = entries(&providers);
        PreferencePolicy::default().apply(Preference::ImproveBenefits, &providers, &mut scores);
        assert!(scores.iter().all(|e| e.score == 1));
    }

    #[test]
    fn test_undecided_changes_nothing() {
        let providers = providers(&[("A", Some(100))]);
        let mut scores = entries(&providers);
        PreferencePolicy::default().apply(Preference::Undecided, &providers, &mut scores);
        assert_eq!(scores[0].score, 0);
        assert!(scores[0].matched_rules.is_empty());
    }
}
