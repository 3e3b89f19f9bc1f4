use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foodgenie_catalog::RecipeCatalog;
use foodgenie_core::{Matcher, OverlapMatcher};
use image::RgbImage;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod engine;
mod render;
mod selection;

use config::Config;
use selection::Selection;

#[derive(Parser)]
#[command(name = "foodgenie", about = "Recipe recommendations from ingredient photos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect ingredients in one or more photos
    Detect {
        /// Photo files (jpg/png)
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Print the detected set as JSON
        #[arg(long)]
        json: bool,
    },
    /// Detect ingredients, then rank the recipe catalog against them
    Recommend {
        /// Photo files (jpg/png)
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Add an ingredient the detector missed (repeatable)
        #[arg(long = "add", value_name = "NAME")]
        add: Vec<String>,
        /// Remove a falsely detected ingredient (repeatable)
        #[arg(long = "remove", value_name = "NAME")]
        remove: Vec<String>,
    },
    /// Rank recipes from an explicit ingredient list, no photos needed
    Suggest {
        /// An ingredient you have (repeatable)
        #[arg(long = "have", value_name = "NAME", required = true)]
        have: Vec<String>,
    },
    /// Inspect and validate recipe catalog data
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List all recipes in the catalog
    List,
    /// Show one recipe in full
    Show {
        /// Recipe name (case-insensitive)
        name: String,
    },
    /// List every ingredient name the catalog knows
    Ingredients,
    /// Validate a catalog file (or the configured one)
    Check {
        /// Catalog JSON file to validate
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Detect { images, json } => {
            let engine = engine::spawn_engine(&config)?;
            let images = load_images(&images)?;
            let detected = engine.detect(images).await?;
            if json {
                let names: Vec<&String> = detected.iter().collect();
                println!("{}", serde_json::to_string(&names)?);
            } else {
                println!("Detected ingredients: {}", render::render_ingredient_line(&detected));
            }
        }
        Commands::Recommend { images, add, remove } => {
            let catalog = load_catalog(&config)?;
            let engine = engine::spawn_engine(&config)?;
            let images = load_images(&images)?;
            let detected = engine.detect(images).await?;
            println!("Detected ingredients: {}", render::render_ingredient_line(&detected));

            let mut selection = Selection::from_detected(detected);
            for name in &add {
                selection.add(name);
            }
            for name in &remove {
                selection.remove(name);
            }

            let matches = OverlapMatcher.rank(selection.names(), catalog.recipes());
            println!("Using ingredients: {}\n", render::render_ingredient_line(selection.names()));
            print!("{}", render::render_matches(&matches, selection.names()));
        }
        Commands::Suggest { have } => {
            let catalog = load_catalog(&config)?;
            let mut selection = Selection::default();
            for name in &have {
                selection.add(name);
            }

            let matches = OverlapMatcher.rank(selection.names(), catalog.recipes());
            println!("Using ingredients: {}\n", render::render_ingredient_line(selection.names()));
            print!("{}", render::render_matches(&matches, selection.names()));
        }
        Commands::Catalog { action } => match action {
            CatalogAction::List => {
                let catalog = load_catalog(&config)?;
                for recipe in catalog.recipes() {
                    println!(
                        "{} ({} ingredients, {} steps)",
                        recipe.name,
                        recipe.ingredients.len(),
                        recipe.steps.len()
                    );
                }
            }
            CatalogAction::Show { name } => {
                let catalog = load_catalog(&config)?;
                let recipe = catalog
                    .find(&name)
                    .with_context(|| format!("no recipe named '{name}' in the catalog"))?;
                println!("{}", recipe.name);
                println!("  ingredients:");
                for ingredient in &recipe.ingredients {
                    println!("    - {ingredient}");
                }
                println!("  steps:");
                for (i, step) in recipe.steps.iter().enumerate() {
                    println!("    {}. {step}", i + 1);
                }
            }
            CatalogAction::Ingredients => {
                let catalog = load_catalog(&config)?;
                for name in catalog.known_ingredients() {
                    println!("{name}");
                }
            }
            CatalogAction::Check { path } => {
                let catalog = match (&path, &config.catalog_path) {
                    (Some(p), _) => RecipeCatalog::load(&p.to_string_lossy())?,
                    (None, Some(p)) => RecipeCatalog::load(&p.to_string_lossy())?,
                    (None, None) => RecipeCatalog::embedded()?,
                };
                println!("catalog ok: {} recipes", catalog.len());
            }
        },
    }

    Ok(())
}

/// Load the configured catalog file, or the embedded starter catalog when
/// no path is set.
fn load_catalog(config: &Config) -> Result<RecipeCatalog> {
    let catalog = match &config.catalog_path {
        Some(path) => RecipeCatalog::load(&path.to_string_lossy())
            .with_context(|| format!("loading catalog from {}", path.display()))?,
        None => RecipeCatalog::embedded()?,
    };
    Ok(catalog)
}

/// Decode every photo into RGB, failing with the offending path.
fn load_images(paths: &[PathBuf]) -> Result<Vec<RgbImage>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let img = image::open(path)
            .with_context(|| format!("cannot read image {}", path.display()))?;
        images.push(img.to_rgb8());
    }
    Ok(images)
}
