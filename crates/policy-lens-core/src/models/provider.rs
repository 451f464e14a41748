//! Insurance provider benefit profiles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whole Swiss francs.
pub type Amount = u32;

/// Hospital room class covered by a supplementary plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomClass {
    /// Shared ward ("chambre commune")
    Common,
    /// Two-bed room ("mi-privée")
    SemiPrivate,
    /// Single room ("privée")
    Private,
    /// Room class chosen at admission
    Flex,
    /// Any other provider-specific tier, stored lowercase (e.g. "top liberty")
    Named(String),
}

impl RoomClass {
    /// Parse a room class label. Accepts French and English spellings.
    pub fn parse(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        match lower.as_str() {
            "common" | "commune" | "chambre commune" | "general" | "générale" => RoomClass::Common,
            "semi-private" | "semi private" | "semiprivate" | "mi-privée" | "mi-privee"
            | "demi-privée" => RoomClass::SemiPrivate,
            "private" | "privée" | "privee" => RoomClass::Private,
            "flex" => RoomClass::Flex,
            _ => RoomClass::Named(lower),
        }
    }

    /// Canonical lowercase label.
    pub fn label(&self) -> &str {
        match self {
            RoomClass::Common => "common",
            RoomClass::SemiPrivate => "semi-private",
            RoomClass::Private => "private",
            RoomClass::Flex => "flex",
            RoomClass::Named(name) => name,
        }
    }
}

impl Default for RoomClass {
    fn default() -> Self {
        RoomClass::Common
    }
}

impl From<String> for RoomClass {
    fn from(label: String) -> Self {
        RoomClass::parse(&label)
    }
}

impl From<RoomClass> for String {
    fn from(class: RoomClass) -> Self {
        class.label().to_string()
    }
}

impl fmt::Display for RoomClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static benefit configuration of one insurance provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderProfile {
    /// Provider name - unique within a catalog
    pub name: String,
    /// Dental care ceiling; `None` means no data, not zero coverage
    #[serde(default)]
    pub dental_ceiling: Option<Amount>,
    /// Orthodontics ceiling; `None` means no data
    #[serde(default)]
    pub orthodontic_ceiling: Option<Amount>,
    /// Hospital room class
    #[serde(default)]
    pub room_class: RoomClass,
    /// Alternative / natural medicine covered
    #[serde(default)]
    pub alt_medicine_covered: bool,
    /// Check-up and fitness contributions covered
    #[serde(default)]
    pub checkup_covered: bool,
    /// Treatment abroad covered
    #[serde(default)]
    pub abroad_covered: bool,
    /// Monthly premium
    #[serde(default)]
    pub monthly_tariff: Option<Amount>,
    /// Annual deductible ("franchise")
    #[serde(default)]
    pub deductible: Option<Amount>,
    /// Insurance model (e.g. "standard", "HMO")
    #[serde(default)]
    pub insurance_model: Option<String>,
}

impl ProviderProfile {
    /// Create a profile with only a name; every benefit absent or false.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dental_ceiling: None,
            orthodontic_ceiling: None,
            room_class: RoomClass::Common,
            alt_medicine_covered: false,
            checkup_covered: false,
            abroad_covered: false,
            monthly_tariff: None,
            deductible: None,
            insurance_model: None,
        }
    }

    /// Whether the provider name matches, ignoring case and surrounding whitespace.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Dental ceiling reaches `amount`. An absent ceiling never qualifies.
    pub fn dental_ceiling_at_least(&self, amount: Amount) -> bool {
        self.dental_ceiling.is_some_and(|ceiling| ceiling >= amount)
    }

    /// Orthodontics ceiling reaches `amount`. An absent ceiling never qualifies.
    pub fn orthodontic_ceiling_at_least(&self, amount: Amount) -> bool {
        self.orthodontic_ceiling
            .is_some_and(|ceiling| ceiling >= amount)
    }
}
