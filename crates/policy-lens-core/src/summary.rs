//! Per-contract module presence summary (LAMal, LCA, hospitalisation, extras).

use serde::{Deserialize, Serialize};

use crate::models::ContractText;

/// One module looked for in a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySection {
    /// Short key, e.g. "lamal"
    pub name: String,
    /// Display label, e.g. "LAMal (base)"
    pub label: String,
    /// Detected when any phrase occurs
    pub any_of: Vec<String>,
    /// Points added to the note when detected
    pub points: u32,
    /// Flag the contract when this section is missing
    #[serde(default)]
    pub required: bool,
}

/// Summary settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub sections: Vec<SummarySection>,
    /// Highest note a contract can get
    pub ceiling: u32,
    /// Scale the note is displayed on ("note / scale")
    pub scale: u32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            ceiling: 7,
            scale: 10,
        }
    }
}

impl SummaryConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.scale == 0 {
            return Err("summary scale must be greater than 0".to_string());
        }
        if self.ceiling > self.scale {
            return Err(format!(
                "summary ceiling {} exceeds scale {}",
                self.ceiling, self.scale
            ));
        }
        for section in &self.sections {
            if section.any_of.is_empty() {
                return Err(format!("summary section {} has no phrase", section.name));
            }
        }
        Ok(())
    }
}

/// Outcome for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResult {
    pub name: String,
    pub label: String,
    pub detected: bool,
    pub points: u32,
    pub required: bool,
}

/// Module presence summary of one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSummary {
    pub source_index: usize,
    pub sections: Vec<SectionResult>,
    /// Sum of detected section points, capped at the configured ceiling
    pub note: u32,
    pub scale: u32,
    /// Labels of required sections not found
    pub missing_required: Vec<String>,
}

impl ContractSummary {
    pub fn is_detected(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name == name && s.detected)
    }
}

/// Summarize which modules a contract mentions.
pub fn summarize(contract: &ContractText, config: &SummaryConfig) -> ContractSummary {
    let sections: Vec<SectionResult> = config
        .sections
        .iter()
        .map(|section| {
            let detected = section.any_of.iter().any(|p| contract.contains(p));
            SectionResult {
                name: section.name.clone(),
                label: section.label.clone(),
                detected,
                points: if detected { section.points } else { 0 },
                required: section.required,
            }
        })
        .collect();

    let total: u32 = sections.iter().map(|s| s.points).sum();
    let missing_required = sections
        .iter()
        .filter(|s| s.required && !s.detected)
        .map(|s| s.label.clone())
        .collect();

    ContractSummary {
        source_index: contract.source_index,
        sections,
        note: total.min(config.ceiling),
        scale: config.scale,
        missing_required,
    }
}
