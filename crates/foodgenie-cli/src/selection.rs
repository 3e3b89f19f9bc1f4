//! User-editable ingredient selection.
//!
//! Detection output is a default, not a constraint: the user may add
//! ingredients the model missed and remove false positives before
//! matching. Every edit is canonicalized, so the matcher always receives
//! lower-cased names.

use foodgenie_core::canonical;
use std::collections::BTreeSet;

/// The set of ingredients the user currently claims to have.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    names: BTreeSet<String>,
}

impl Selection {
    /// Start from a detector result.
    pub fn from_detected(detected: BTreeSet<String>) -> Self {
        Self {
            names: detected.iter().map(|n| canonical(n)).collect(),
        }
    }

    /// Add an ingredient. Adding one already present is a no-op.
    pub fn add(&mut self, name: &str) {
        self.names.insert(canonical(name));
    }

    /// Remove an ingredient. Removing one not present is a no-op.
    pub fn remove(&mut self, name: &str) {
        self.names.remove(&canonical(name));
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
