use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Canonical form of an ingredient name: lower-cased, otherwise untouched.
///
/// No stemming, no synonym resolution. Two names refer to the same
/// ingredient iff their canonical forms are equal.
pub fn canonical(name: &str) -> String {
    name.to_lowercase()
}

/// A recipe record from the catalog.
///
/// `ingredients` keeps its display casing and order; matching treats it
/// as a set of canonical names. `steps` order is the execution sequence
/// and is preserved verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    /// Absent in the source data means "no ingredients", never an error.
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl Recipe {
    /// Canonical ingredient set. Duplicates in the display list collapse.
    pub fn ingredient_set(&self) -> BTreeSet<String> {
        self.ingredients.iter().map(|i| canonical(i)).collect()
    }
}

/// Result of matching one recipe against the current ingredient selection.
#[derive(Debug, Clone)]
pub struct RecipeMatch {
    pub recipe: Recipe,
    /// Count of distinct recipe ingredients present in the selection.
    pub matching_count: usize,
    /// True iff every recipe ingredient is in the selection.
    pub can_make: bool,
}

impl RecipeMatch {
    /// Number of distinct ingredients the recipe requires (for "n/m" display).
    pub fn required_count(&self) -> usize {
        self.recipe.ingredient_set().len()
    }
}

/// Strategy for ranking a recipe catalog against an ingredient selection.
pub trait Matcher {
    fn rank(&self, selected: &BTreeSet<String>, catalog: &[Recipe]) -> Vec<RecipeMatch>;
}

/// Set-overlap matcher.
///
/// Emits one [`RecipeMatch`] per recipe with at least one ingredient in
/// the selection, ordered buildable-first then by overlap count, with
/// catalog order preserved for equal keys (stable sort).
pub struct OverlapMatcher;

impl Matcher for OverlapMatcher {
    fn rank(&self, selected: &BTreeSet<String>, catalog: &[Recipe]) -> Vec<RecipeMatch> {
        // Canonicalize the selection side here as well, so matching is
        // case-insensitive regardless of what the caller passed in.
        let selected: BTreeSet<String> = selected.iter().map(|s| canonical(s)).collect();

        let mut matches = Vec::new();
        for recipe in catalog {
            let wanted = recipe.ingredient_set();
            let matching_count = wanted.intersection(&selected).count();
            if matching_count == 0 {
                continue;
            }
            let can_make = wanted.is_subset(&selected);
            matches.push(RecipeMatch {
                recipe: recipe.clone(),
                matching_count,
                can_make,
            });
        }

        // sort_by_key is stable: equal keys keep catalog order.
        matches.sort_by_key(|m| (Reverse(m.can_make), Reverse(m.matching_count)));
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            name: name.into(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            steps: vec!["cook".into()],
        }
    }

    fn selection(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_basic_ordering() {
        // Recipe A fully buildable, B partial
        let catalog = vec![
            recipe("A", &["Egg", "Rice"]),
            recipe("B", &["Egg", "Milk"]),
        ];
        let result = OverlapMatcher.rank(&selection(&["egg", "rice"]), &catalog);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].recipe.name, "A");
        assert_eq!(result[0].matching_count, 2);
        assert!(result[0].can_make);
        assert_eq!(result[1].recipe.name, "B");
        assert_eq!(result[1].matching_count, 1);
        assert!(!result[1].can_make);
    }

    #[test]
    fn test_rank_excludes_zero_overlap() {
        let catalog = vec![
            recipe("A", &["Egg"]),
            recipe("B", &["Flour", "Milk"]),
        ];
        let result = OverlapMatcher.rank(&selection(&["egg"]), &catalog);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].recipe.name, "A");
        assert!(result.iter().all(|m| m.matching_count > 0));
    }

    #[test]
    fn test_rank_empty_selection() {
        let catalog = vec![recipe("A", &["Egg"])];
        assert!(OverlapMatcher.rank(&selection(&[]), &catalog).is_empty());
    }

    #[test]
    fn test_rank_empty_catalog() {
        assert!(OverlapMatcher.rank(&selection(&["egg"]), &[]).is_empty());
    }

    #[test]
    fn test_rank_empty_both() {
        assert!(OverlapMatcher.rank(&selection(&[]), &[]).is_empty());
    }

    #[test]
    fn test_rank_empty_ingredient_list_excluded() {
        // Zero intersection with any selection, so never returned
        let catalog = vec![recipe("C", &[])];
        let result = OverlapMatcher.rank(&selection(&["egg"]), &catalog);
        assert!(result.is_empty());
    }

    #[test]
    fn test_rank_case_insensitive_both_sides() {
        let catalog = vec![recipe("A", &["egg", "rice"])];
        let result = OverlapMatcher.rank(&selection(&["EGG", "Rice"]), &catalog);

        assert_eq!(result.len(), 1);
        assert!(result[0].can_make);
        assert_eq!(result[0].matching_count, 2);

        // And the other way round: display-cased recipe, lower-cased selection
        let catalog = vec![recipe("A", &["Egg", "Rice"])];
        let result = OverlapMatcher.rank(&selection(&["egg", "rice"]), &catalog);
        assert!(result[0].can_make);
    }

    #[test]
    fn test_rank_duplicates_do_not_inflate_count() {
        let catalog = vec![recipe("A", &["Egg", "egg", "EGG", "Rice"])];
        let result = OverlapMatcher.rank(&selection(&["egg"]), &catalog);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].matching_count, 1);
        assert!(!result[0].can_make);
        assert_eq!(result[0].required_count(), 2);
    }

    #[test]
    fn test_rank_can_make_implies_full_count() {
        let catalog = vec![
            recipe("A", &["Egg", "Rice"]),
            recipe("B", &["Egg", "Rice", "Oil"]),
            recipe("C", &["Milk"]),
        ];
        let result = OverlapMatcher.rank(&selection(&["egg", "rice", "oil"]), &catalog);

        for m in &result {
            if m.can_make {
                assert_eq!(m.matching_count, m.required_count());
            }
        }
    }

    #[test]
    fn test_rank_buildable_precede_partial() {
        // A small buildable recipe must outrank a larger partial one,
        // even when the partial one has the higher overlap count.
        let catalog = vec![
            recipe("Big Partial", &["Egg", "Rice", "Oil", "Salt", "Milk"]),
            recipe("Small Full", &["Egg"]),
        ];
        let result = OverlapMatcher.rank(&selection(&["egg", "rice", "oil", "salt"]), &catalog);

        assert_eq!(result[0].recipe.name, "Small Full");
        assert!(result[0].can_make);
        assert_eq!(result[1].recipe.name, "Big Partial");
        assert_eq!(result[1].matching_count, 4);
    }

    #[test]
    fn test_rank_overlap_non_increasing_within_group() {
        let catalog = vec![
            recipe("One", &["Egg", "Milk"]),
            recipe("Three", &["Egg", "Rice", "Oil", "Milk"]),
            recipe("Two", &["Egg", "Rice", "Milk"]),
        ];
        let result = OverlapMatcher.rank(&selection(&["egg", "rice", "oil"]), &catalog);

        assert_eq!(result.len(), 3);
        assert!(!result.iter().any(|m| m.can_make));
        let counts: Vec<usize> = result.iter().map(|m| m.matching_count).collect();
        assert_eq!(counts, vec![3, 2, 1]);
    }

    #[test]
    fn test_rank_ties_keep_catalog_order() {
        // Both buildable with equal overlap: catalog order decides.
        let catalog = vec![
            recipe("First", &["Egg", "Rice"]),
            recipe("Second", &["Rice", "Oil"]),
        ];
        let result = OverlapMatcher.rank(&selection(&["egg", "rice", "oil"]), &catalog);

        assert_eq!(result.len(), 2);
        assert!(result[0].can_make && result[1].can_make);
        assert_eq!(result[0].matching_count, result[1].matching_count);
        assert_eq!(result[0].recipe.name, "First");
        assert_eq!(result[1].recipe.name, "Second");
    }

    #[test]
    fn test_recipe_preserves_display_fields() {
        let catalog = vec![Recipe {
            name: "Omelette".into(),
            ingredients: vec!["Egg".into(), "Butter".into()],
            steps: vec!["Whisk eggs".into(), "Fry in butter".into()],
        }];
        let result = OverlapMatcher.rank(&selection(&["egg", "butter"]), &catalog);

        // Display casing and step order survive matching untouched.
        assert_eq!(result[0].recipe.ingredients, vec!["Egg", "Butter"]);
        assert_eq!(result[0].recipe.steps, vec!["Whisk eggs", "Fry in butter"]);
    }

    #[test]
    fn test_canonical_lowercases_only() {
        assert_eq!(canonical("EGG"), "egg");
        assert_eq!(canonical("Spring Onion"), "spring onion");
        assert_eq!(canonical("egg"), "egg");
    }

    #[test]
    fn test_recipe_missing_ingredients_field_defaults_empty() {
        let recipe: Recipe =
            serde_json::from_str(r#"{"name": "Toast", "steps": ["toast bread"]}"#).unwrap();
        assert!(recipe.ingredients.is_empty());
    }
}
