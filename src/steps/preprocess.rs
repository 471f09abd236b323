// src/steps/preprocess.rs

use super::{or_discard, require_inputs, StepOutcome};
use crate::cache;
use crate::config::DataLayout;
use crate::dump::reader::DumpReader;
use crate::error::{Error, Result};
use crate::hash::{hash_reader, ContentHash, HashingReader};
use crate::progress::ProgressTracker;
use crate::recipe::aggregate::RecipeAggregator;
use crate::recipe::format::RecipeFile;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;
use tracing::info;

/// Turn the raw dump into the de-duplicated recipe catalog
pub fn preprocess_recipes(layout: &DataLayout, progress: &dyn ProgressTracker) -> Result<StepOutcome> {
    let input = layout.dump();
    let output = layout.preprocessed();
    require_inputs(&[&input])?;

    let mut file = File::open(&input)?;
    let sha = hash_reader(&mut file)?;
    if cache::is_up_to_date(&output, &sha) {
        progress.finish_with_message("Preprocessed recipes are up to date");
        return Ok(StepOutcome::UpToDate);
    }

    let result = or_discard(&output, || {
        file.seek(SeekFrom::Start(0))?;
        let recipes = read_dump(&input, file, &sha, progress)?;
        let count = recipes.recipes.len();
        recipes.save_atomic(&output)?;
        Ok(count)
    });

    match result {
        Ok(count) => {
            info!("Wrote {} recipes to {}", count, output.display());
            progress.finish_with_message(&format!("Preprocessed {} recipes", count));
            Ok(StepOutcome::Written { recipes: count })
        }
        Err(e) => {
            progress.finish_with_error(&e.to_string());
            Err(e)
        }
    }
}

/// Parse and aggregate the dump, checking it still hashes to `sha`
fn read_dump(
    path: &Path,
    file: File,
    sha: &ContentHash,
    progress: &dyn ProgressTracker,
) -> Result<RecipeFile> {
    info!("Loading recipes from {}", path.display());
    progress.set_message("Reading dump");

    let mut reader = DumpReader::new(BufReader::new(HashingReader::new(file)))?;
    let mut aggregator = RecipeAggregator::new();
    for query in reader.by_ref() {
        let query = query?;
        for handler in &query.handlers {
            aggregator.add_handler(handler)?;
            progress.increment(handler.recipes.len() as u64);
        }
    }

    let version = reader
        .version()
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedDump("dump has no \"version\"".to_string()))?;

    let parsed = reader.into_inner().into_inner().finish()?;
    if parsed != *sha {
        return Err(Error::SourceChanged(path.to_path_buf()));
    }

    info!(
        "Read {} recipe entries from dump version {}",
        aggregator.processed(),
        version
    );
    progress.set_message("Grouping recipes");
    let recipes = aggregator.finish()?;

    Ok(RecipeFile::new(version, sha.as_str(), recipes.into_vec()))
}
