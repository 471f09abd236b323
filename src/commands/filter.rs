// src/commands/filter.rs

//! Filter command - narrow the catalog by handler and exclusion rules

use super::progress::step_progress;
use anyhow::{Context, Result};
use nerd_converter::{filter_recipes, Config, DataLayout, StepOutcome};
use std::path::Path;
use tracing::info;

pub fn cmd_filter(layout: &DataLayout, config_path: &Path, plain_progress: bool) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    info!(
        "Filtering with {} handler names, {} handler mods, {} exclusion rules",
        config.filter.handler_names.len(),
        config.filter.handler_mods.len(),
        config.filter.exclude_recipes.len()
    );

    let progress = step_progress("filter", plain_progress);
    let outcome = filter_recipes(layout, &config.filter, progress.as_ref()).with_context(|| {
        format!("Failed to filter {}", layout.preprocessed().display())
    })?;

    match outcome {
        StepOutcome::UpToDate => {
            println!("{} is up to date", layout.filtered().display());
        }
        StepOutcome::Written { recipes } => {
            println!("Kept {} recipes in {}", recipes, layout.filtered().display());
        }
    }
    Ok(())
}
