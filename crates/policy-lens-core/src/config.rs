//! Intake configuration: catalog, scoring rules, detector and summary settings.
//!
//! Loaded once by the caller from an editable TOML or JSON file and validated
//! before any analysis runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, ReferenceCatalog};
use crate::detector::DetectorConfig;
use crate::models::ProviderProfile;
use crate::scorer::ScoringConfig;
use crate::summary::SummaryConfig;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything the core needs, as read from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Reference catalog, in ranking tie-break order
    pub providers: Vec<ProviderProfile>,
    pub scoring: ScoringConfig,
    pub detector: DetectorConfig,
    pub summary: SummaryConfig,
}

impl IntakeConfig {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build the validated catalog.
    pub fn catalog(&self) -> ConfigResult<ReferenceCatalog> {
        Ok(ReferenceCatalog::new(self.providers.clone())?)
    }

    /// Validate every section and cross-references into the catalog.
    pub fn validate(&self) -> ConfigResult<ReferenceCatalog> {
        let catalog = self.catalog()?;

        self.scoring.validate().map_err(ConfigError::Invalid)?;
        self.detector.validate().map_err(ConfigError::Invalid)?;
        self.summary.validate().map_err(ConfigError::Invalid)?;

        for rule in &self.scoring.rules {
            for name in rule.predicate.named_providers() {
                if !catalog.contains(name) {
                    return Err(ConfigError::Invalid(format!(
                        "scoring rule {} names unknown provider {}",
                        rule.name, name
                    )));
                }
            }
        }
        if let Some(fallback) = &self.scoring.preference.low_cost_fallback {
            if !catalog.contains(fallback) {
                return Err(ConfigError::Invalid(format!(
                    "low_cost_fallback names unknown provider {}",
                    fallback
                )));
            }
        }

        Ok(catalog)
    }
}
