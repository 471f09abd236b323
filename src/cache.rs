// src/cache.rs

//! Content-hash cache gate for the pipeline steps
//!
//! Each step's output records the SHA-256 of the input it was produced from.
//! A step can be skipped when its output already exists, parses as a recipe
//! file and carries the hash of the current input. Anything else, including
//! an unreadable or half-written output, counts as a miss and is never an
//! error.

use crate::hash::ContentHash;
use crate::recipe::format::RecipeFile;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Why a cached output can or can't be reused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// The output exists and was produced from the expected input
    UpToDate,
    /// There is no output yet
    Missing,
    /// The output could not be read or is not a recipe file
    Unreadable(String),
    /// The output was produced from different input
    Stale { recorded: String },
}

impl CacheStatus {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate)
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate => write!(f, "up to date"),
            Self::Missing => write!(f, "missing"),
            Self::Unreadable(reason) => write!(f, "unreadable ({})", reason),
            Self::Stale { recorded } => write!(f, "stale (built from {})", recorded),
        }
    }
}

/// Inspect a cached output against the hash of the current input
pub fn check(output: &Path, expected: &ContentHash) -> CacheStatus {
    if !output.exists() {
        debug!("No cached output at {}", output.display());
        return CacheStatus::Missing;
    }

    info!(
        "Cached recipe file found at {}, checking if it's up to date",
        output.display()
    );
    let status = match RecipeFile::load(output) {
        Ok(file) if expected.matches(&file.dump_sha) => CacheStatus::UpToDate,
        Ok(file) => CacheStatus::Stale {
            recorded: file.dump_sha,
        },
        Err(e) => CacheStatus::Unreadable(e.to_string()),
    };

    if status.is_up_to_date() {
        info!("Cached recipe file is up to date");
    } else {
        info!("Cached recipe file is {}", status);
    }
    status
}

/// Whether `output` can be reused for an input hashing to `expected`
pub fn is_up_to_date(output: &Path, expected: &ContentHash) -> bool {
    check(output, expected).is_up_to_date()
}
