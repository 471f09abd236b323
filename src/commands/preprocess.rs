// src/commands/preprocess.rs

//! Preprocess command - dump to recipe catalog

use super::progress::step_progress;
use anyhow::{Context, Result};
use nerd_converter::{preprocess_recipes, DataLayout, StepOutcome};

pub fn cmd_preprocess(layout: &DataLayout, plain_progress: bool) -> Result<()> {
    let progress = step_progress("preprocess", plain_progress);

    let outcome = preprocess_recipes(layout, progress.as_ref()).with_context(|| {
        format!("Failed to preprocess {}", layout.dump().display())
    })?;

    match outcome {
        StepOutcome::UpToDate => {
            println!("{} is up to date", layout.preprocessed().display());
        }
        StepOutcome::Written { recipes } => {
            println!(
                "Wrote {} recipes to {}",
                recipes,
                layout.preprocessed().display()
            );
        }
    }
    Ok(())
}
