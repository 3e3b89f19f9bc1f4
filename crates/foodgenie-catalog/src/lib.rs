//! Recipe catalog loading and validation.
//!
//! The catalog is a JSON array of recipe records, loaded once per session
//! and read-only afterwards. Malformed records fail here, at load time,
//! so the matcher downstream can assume well-formed input. A starter
//! catalog is embedded at compile time from `data/recipes.json` for runs
//! with no catalog file configured.

use foodgenie_core::{canonical, Recipe};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Compile-time embedded starter catalog.
const STARTER_CATALOG: &str = include_str!("../data/recipes.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    NotFound(String),
    #[error("cannot read catalog file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("catalog is not a valid JSON recipe array: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("recipe #{index} has an empty name")]
    EmptyName { index: usize },
}

/// An immutable, validated recipe collection.
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    /// Load and validate a catalog from a JSON file.
    pub fn load(path: &str) -> Result<Self, CatalogError> {
        if !Path::new(path).exists() {
            return Err(CatalogError::NotFound(path.to_string()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_string(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(path, recipes = catalog.len(), "loaded recipe catalog");
        Ok(catalog)
    }

    /// Parse and validate a catalog from a JSON string.
    ///
    /// Hard errors: unparseable JSON, a record missing `name` or `steps`,
    /// an empty `name`. Soft issues (logged, not fatal): duplicate recipe
    /// names, recipes with no steps or no ingredients.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let recipes: Vec<Recipe> = serde_json::from_str(raw)?;

        let mut seen_names = BTreeSet::new();
        for (index, recipe) in recipes.iter().enumerate() {
            if recipe.name.trim().is_empty() {
                return Err(CatalogError::EmptyName { index });
            }
            if !seen_names.insert(canonical(&recipe.name)) {
                tracing::warn!(name = %recipe.name, "duplicate recipe name in catalog");
            }
            if recipe.steps.is_empty() {
                tracing::warn!(name = %recipe.name, "recipe has no steps");
            }
            if recipe.ingredients.is_empty() {
                // Legal, but such a recipe can never match anything.
                tracing::warn!(name = %recipe.name, "recipe has no ingredients");
            }
        }

        Ok(Self { recipes })
    }

    /// Parse the compile-time embedded starter catalog.
    pub fn embedded() -> Result<Self, CatalogError> {
        let catalog = Self::from_json(STARTER_CATALOG)?;
        tracing::info!(recipes = catalog.len(), "using embedded starter catalog");
        Ok(catalog)
    }

    /// The read-only recipe records, in catalog order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Look up a recipe by name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&Recipe> {
        let wanted = canonical(name);
        self.recipes.iter().find(|r| canonical(&r.name) == wanted)
    }

    /// Sorted union of every canonical ingredient name in the catalog.
    ///
    /// The original correction UI offers this as the pool of selectable
    /// ingredients alongside whatever the detector found.
    pub fn known_ingredients(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .recipes
            .iter()
            .flat_map(|r| r.ingredients.iter().map(|i| canonical(i)))
            .collect();
        set.into_iter().collect()
    }
}
