//! Plain-text rendering of ranked recipe matches.

use foodgenie_core::{canonical, RecipeMatch};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Render the ranked match list with per-ingredient possession markers
/// and numbered steps.
pub fn render_matches(matches: &[RecipeMatch], selected: &BTreeSet<String>) -> String {
    if matches.is_empty() {
        return "No matching recipes for your ingredients.\n".to_string();
    }

    let mut out = String::new();
    for m in matches {
        let status = if m.can_make {
            "ready to cook".to_string()
        } else {
            format!("{}/{} ingredients on hand", m.matching_count, m.required_count())
        };
        let _ = writeln!(out, "{} — {}", m.recipe.name, status);

        let _ = writeln!(out, "  ingredients:");
        for ingredient in &m.recipe.ingredients {
            let marker = if selected.contains(&canonical(ingredient)) {
                "[x]"
            } else {
                "[ ] missing:"
            };
            let _ = writeln!(out, "    {marker} {ingredient}");
        }

        let _ = writeln!(out, "  steps:");
        for (i, step) in m.recipe.steps.iter().enumerate() {
            let _ = writeln!(out, "    {}. {step}", i + 1);
        }
        out.push('\n');
    }
    out
}

/// Render a detected/selected ingredient set as one comma-separated line.
pub fn render_ingredient_line(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodgenie_core::{Matcher, OverlapMatcher, Recipe};

    fn sample_matches() -> (Vec<RecipeMatch>, BTreeSet<String>) {
        let catalog = vec![
            Recipe {
                name: "Omelette".into(),
                ingredients: vec!["Egg".into(), "Butter".into()],
                steps: vec!["Whisk".into(), "Fry".into()],
            },
            Recipe {
                name: "Pancakes".into(),
                ingredients: vec!["Egg".into(), "Flour".into(), "Milk".into()],
                steps: vec!["Mix".into(), "Fry".into()],
            },
        ];
        let selected: BTreeSet<String> = ["egg".to_string(), "butter".to_string()].into();
        (OverlapMatcher.rank(&selected, &catalog), selected)
    }

    #[test]
    fn test_render_buildable_status() {
        let (matches, selected) = sample_matches();
        let out = render_matches(&matches, &selected);
        assert!(out.contains("Omelette — ready to cook"));
        assert!(out.contains("Pancakes — 1/3 ingredients on hand"));
    }

    #[test]
    fn test_render_possession_markers() {
        let (matches, selected) = sample_matches();
        let out = render_matches(&matches, &selected);
        assert!(out.contains("[x] Egg"));
        assert!(out.contains("[ ] missing: Flour"));
    }

    #[test]
    fn test_render_numbered_steps_in_order() {
        let (matches, selected) = sample_matches();
        let out = render_matches(&matches, &selected);
        let whisk = out.find("1. Whisk").unwrap();
        let fry = out.find("2. Fry").unwrap();
        assert!(whisk < fry);
    }

    #[test]
    fn test_render_empty() {
        let out = render_matches(&[], &BTreeSet::new());
        assert!(out.contains("No matching recipes"));
    }

    #[test]
    fn test_render_ingredient_line() {
        let names: BTreeSet<String> = ["rice".to_string(), "egg".to_string()].into();
        assert_eq!(render_ingredient_line(&names), "egg, rice");
        assert_eq!(render_ingredient_line(&BTreeSet::new()), "(none)");
    }
}
