//! Static name tables
//!
//! The canonical name map, the excluded name set and the highlight set are
//! hand-curated per book. They are loaded once from configuration and passed
//! explicitly to whatever needs them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Hand-curated name tables for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameTables {
    /// Surface form -> canonical person identity
    pub canonical: BTreeMap<String, String>,

    /// Surface forms known to be false-positive detections
    pub excluded: BTreeSet<String>,

    /// Canonical names rendered in the highlight colour
    pub highlight: BTreeSet<String>,
}

impl NameTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface form mapping
    pub fn with_alias(mut self, surface: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.canonical.insert(surface.into(), canonical.into());
        self
    }

    /// Add an excluded surface form
    pub fn with_excluded(mut self, name: impl Into<String>) -> Self {
        self.excluded.insert(name.into());
        self
    }

    /// Add a highlighted name
    pub fn with_highlight(mut self, name: impl Into<String>) -> Self {
        self.highlight.insert(name.into());
        self
    }

    /// Map a surface form to its canonical identity.
    ///
    /// Unmapped forms are their own identity. Matching is exact.
    pub fn canonicalize<'a>(&'a self, surface: &'a str) -> &'a str {
        self.canonical
            .get(surface)
            .map(String::as_str)
            .unwrap_or(surface)
    }

    /// Canonicalize, then drop excluded identities
    pub fn resolve<'a>(&'a self, surface: &'a str) -> Option<&'a str> {
        let canonical = self.canonicalize(surface);
        (!self.is_excluded(canonical)).then_some(canonical)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }

    pub fn is_highlighted(&self, name: &str) -> bool {
        self.highlight.contains(name)
    }

    /// Every surface form the map knows about, keys and values alike
    pub fn known_forms(&self) -> impl Iterator<Item = &str> {
        self.canonical
            .keys()
            .chain(self.canonical.values())
            .map(String::as_str)
    }

    /// Reject chained mappings.
    ///
    /// A canonical value must not itself be a key that maps to a different
    /// value, otherwise canonicalizing twice would not be a no-op.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (surface, canonical) in &self.canonical {
            if surface.trim().is_empty() || canonical.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "names.canonical".to_string(),
                    value: format!("{surface:?} = {canonical:?}"),
                });
            }
            if let Some(next) = self.canonical.get(canonical) {
                if next != canonical {
                    return Err(ConfigError::InvalidValue {
                        key: format!("names.canonical.{surface}"),
                        value: format!("{canonical} is itself mapped to {next}"),
                    });
                }
            }
        }
        Ok(())
    }
}
