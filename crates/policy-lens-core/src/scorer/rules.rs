//! Additive signal rules: trigger phrase → provider predicate → points.

use serde::{Deserialize, Serialize};

use crate::models::{Amount, ContractText, ProviderProfile, RoomClass};

/// Phrase condition evaluated against the lowercased contract text.
///
/// Fires when every `all_of` phrase occurs and, if `any_of` is non-empty, at
/// least one of its phrases occurs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trigger {
    pub all_of: Vec<String>,
    pub any_of: Vec<String>,
}

impl Trigger {
    /// Trigger on any of the given phrases.
    pub fn any<S: Into<String>>(phrases: impl IntoIterator<Item = S>) -> Self {
        Self {
            all_of: Vec::new(),
            any_of: phrases.into_iter().map(Into::into).collect(),
        }
    }

    /// Require `phrase` in addition to the existing conditions.
    pub fn and(mut self, phrase: impl Into<String>) -> Self {
        self.all_of.push(phrase.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.all_of.is_empty() && self.any_of.is_empty()
    }

    pub fn fires(&self, contract: &ContractText) -> bool {
        if self.is_empty() {
            return false;
        }
        self.all_of.iter().all(|p| contract.contains(p))
            && (self.any_of.is_empty() || self.any_of.iter().any(|p| contract.contains(p)))
    }
}

/// Which providers a fired rule credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderPredicate {
    /// Dental ceiling at or above the amount; absent ceilings never match
    DentalCeilingAtLeast(Amount),
    /// Orthodontics ceiling at or above the amount; absent ceilings never match
    OrthodonticCeilingAtLeast(Amount),
    /// Room class in the given tier set
    RoomClassIn(Vec<RoomClass>),
    AltMedicineCovered,
    CheckupCovered,
    AbroadCovered,
    /// Only the named providers (exact self-identification)
    Providers(Vec<String>),
    /// Every provider
    Any,
}

impl ProviderPredicate {
    pub fn matches(&self, provider: &ProviderProfile) -> bool {
        match self {
            ProviderPredicate::DentalCeilingAtLeast(amount) => {
                provider.dental_ceiling_at_least(*amount)
            }
            ProviderPredicate::OrthodonticCeilingAtLeast(amount) => {
                provider.orthodontic_ceiling_at_least(*amount)
            }
            ProviderPredicate::RoomClassIn(classes) => classes.contains(&provider.room_class),
            ProviderPredicate::AltMedicineCovered => provider.alt_medicine_covered,
            ProviderPredicate::CheckupCovered => provider.checkup_covered,
            ProviderPredicate::AbroadCovered => provider.abroad_covered,
            ProviderPredicate::Providers(names) => names.iter().any(|n| provider.is_named(n)),
            ProviderPredicate::Any => true,
        }
    }

    /// Provider names this predicate refers to explicitly.
    pub fn named_providers(&self) -> &[String] {
        match self {
            ProviderPredicate::Providers(names) => names,
            _ => &[],
        }
    }
}

/// One scoring rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    /// Rule name, recorded on credited entries
    pub name: String,
    pub trigger: Trigger,
    pub predicate: ProviderPredicate,
    pub points: u32,
}

impl ScoringRule {
    pub fn new(
        name: impl Into<String>,
        trigger: Trigger,
        predicate: ProviderPredicate,
        points: u32,
    ) -> Self {
        Self {
            name: name.into(),
            trigger,
            predicate,
            points,
        }
    }
}
