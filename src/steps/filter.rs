// src/steps/filter.rs

use super::{or_discard, require_inputs, StepOutcome};
use crate::cache;
use crate::config::DataLayout;
use crate::dump::stacks::StackRegistry;
use crate::error::Result;
use crate::filter::alias::{load_oredict, AliasTable};
use crate::filter::config::FilterConfig;
use crate::filter::engine::FilterEngine;
use crate::filter::handlers::{allowed_machines, load_handlers};
use crate::hash::hash_bytes;
use crate::progress::ProgressTracker;
use crate::recipe::format::RecipeFile;
use std::fs;
use tracing::info;

/// Filter the preprocessed catalog down to the configured handlers and rules
///
/// The preprocessed file is read once into memory; the bytes that are hashed
/// for the cache check are the bytes that get parsed.
pub fn filter_recipes(
    layout: &DataLayout,
    config: &FilterConfig,
    progress: &dyn ProgressTracker,
) -> Result<StepOutcome> {
    let input = layout.preprocessed();
    let output = layout.filtered();
    let stacks = layout.stacks();
    let handlers = layout.handlers();
    let oredict = layout.oredict();
    require_inputs(&[&input, &stacks, &handlers, &oredict])?;

    let bytes = fs::read(&input)?;
    let sha = hash_bytes(&bytes);
    if cache::is_up_to_date(&output, &sha) {
        progress.finish_with_message("Filtered recipes are up to date");
        return Ok(StepOutcome::UpToDate);
    }

    let result = or_discard(&output, || {
        info!("Loading preprocessed recipes, stacks, handlers and oredict");
        progress.set_message("Loading tables");
        let recipes = RecipeFile::from_slice(&bytes)?;
        let registry = StackRegistry::load(&stacks)?;
        let handler_rows = load_handlers(&handlers)?;
        let oredict_rows = load_oredict(&oredict)?;

        info!("Preparing item data and oredict lookups");
        let aliases = AliasTable::build(&registry, &oredict_rows);
        let allowed = allowed_machines(config, &handler_rows);
        let engine = FilterEngine::new(config, allowed, &aliases)?;

        progress.set_message("Filtering recipes");
        let (kept, report) = engine.filter(recipes.recipes, progress);
        info!("Filter: {}", report);

        let filtered = RecipeFile::new(recipes.dump_version, sha.as_str(), kept);
        filtered.save_atomic(&output)?;
        Ok(report.kept)
    });

    match result {
        Ok(count) => {
            info!("Wrote {} recipes to {}", count, output.display());
            progress.finish_with_message(&format!("Kept {} recipes", count));
            Ok(StepOutcome::Written { recipes: count })
        }
        Err(e) => {
            progress.finish_with_error(&e.to_string());
            Err(e)
        }
    }
}
