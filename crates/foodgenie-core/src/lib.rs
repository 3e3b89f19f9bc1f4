//! foodgenie-core — Ingredient detection and recipe matching engine.
//!
//! Detects food ingredients in photos with a YOLOv8 model running via
//! ONNX Runtime, and ranks a recipe catalog by ingredient overlap.

pub mod detector;
pub mod labels;
pub mod types;

pub use types::{canonical, Matcher, OverlapMatcher, Recipe, RecipeMatch};
