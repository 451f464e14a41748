//! Reference catalog of provider benefit profiles.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::ProviderProfile;

/// Catalog validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate provider: {0}")]
    DuplicateProvider(String),

    #[error("Provider name must not be empty")]
    EmptyName,
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Validated, immutable set of provider profiles in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceCatalog {
    providers: Vec<ProviderProfile>,
}

impl ReferenceCatalog {
    /// Build a catalog, rejecting empty or duplicate (case-insensitive) names.
    pub fn new(providers: Vec<ProviderProfile>) -> CatalogResult<Self> {
        let mut seen = HashSet::new();
        for provider in &providers {
            let key = provider.name.trim().to_lowercase();
            if key.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if !seen.insert(key) {
                return Err(CatalogError::DuplicateProvider(provider.name.clone()));
            }
        }
        Ok(Self { providers })
    }

    /// Providers in insertion order.
    pub fn providers(&self) -> &[ProviderProfile] {
        &self.providers
    }

    /// Look up a provider by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&ProviderProfile> {
        self.providers.iter().find(|p| p.is_named(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Lowest monthly tariff among providers that publish one.
    pub fn lowest_tariff(&self) -> Option<u32> {
        self.providers.iter().filter_map(|p| p.monthly_tariff).min()
    }
}

impl AsRef<[ProviderProfile]> for ReferenceCatalog {
    fn as_ref(&self) -> &[ProviderProfile] {
        &self.providers
    }
}
