// src/steps/mod.rs

//! The two pipeline steps
//!
//! Both steps follow the same shape: hash the upstream file, skip the step if
//! the output already records that hash, otherwise do the work and write the
//! output atomically with the hash stamped in. A step that fails after the
//! cache check removes any stale output so it can't be picked up later as a
//! result of the current input.

mod filter;
mod preprocess;

pub use filter::filter_recipes;
pub use preprocess::preprocess_recipes;

use crate::error::{Error, Result};
use crate::recipe::format::discard_output;
use std::path::Path;
use tracing::warn;

/// What a step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The existing output was produced from the current input
    UpToDate,
    /// A new output was written with this many recipes
    Written { recipes: usize },
}

fn require_inputs(paths: &[&Path]) -> Result<()> {
    for path in paths {
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Run `work`, removing `output` if it fails
fn or_discard<T>(output: &Path, work: impl FnOnce() -> Result<T>) -> Result<T> {
    work().inspect_err(|_| {
        if let Err(e) = discard_output(output) {
            warn!("Could not remove stale output {}: {}", output.display(), e);
        }
    })
}
