//! Class-label table for the ingredient detection model.
//!
//! Loaded from a JSON sidecar next to the ONNX export (a plain array of
//! class names, indexed by class id). Names are lower-cased at load so
//! everything downstream sees canonical ingredient names.

use crate::types::canonical;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("label file not found: {0} — export class names alongside the model")]
    NotFound(String),
    #[error("cannot read label file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("label file is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("label file contains no class names")]
    Empty,
}

/// Class-index → canonical ingredient name table.
#[derive(Debug, Clone)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    /// Load class names from a JSON array file.
    pub fn load(path: &str) -> Result<Self, LabelError> {
        if !Path::new(path).exists() {
            return Err(LabelError::NotFound(path.to_string()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| LabelError::Io {
            path: path.to_string(),
            source,
        })?;
        let names: Vec<String> = serde_json::from_str(&raw)?;
        let table = Self::from_names(names)?;
        tracing::info!(path, classes = table.len(), "loaded ingredient label table");
        Ok(table)
    }

    /// Build a table from in-memory names, canonicalizing each one.
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Result<Self, LabelError> {
        let names: Vec<String> = names.into_iter().map(|n| canonical(&n)).collect();
        if names.is_empty() {
            return Err(LabelError::Empty);
        }
        Ok(Self { names })
    }

    /// Canonical name for a class id, if the id is in range.
    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names_canonicalizes() {
        let table =
            LabelTable::from_names(vec!["Egg".into(), "Spring Onion".into()]).unwrap();
        assert_eq!(table.get(0), Some("egg"));
        assert_eq!(table.get(1), Some("spring onion"));
    }

    #[test]
    fn test_get_out_of_range() {
        let table = LabelTable::from_names(vec!["egg".into()]).unwrap();
        assert_eq!(table.get(5), None);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            LabelTable::from_names(Vec::<String>::new()),
            Err(LabelError::Empty)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            LabelTable::load("/nonexistent/labels.json"),
            Err(LabelError::NotFound(_))
        ));
    }
}
