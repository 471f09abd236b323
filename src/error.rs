// src/error.rs

//! Error types shared by every stage of the converter

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading, aggregating, or filtering recipes
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading an input or writing an output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV table could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML config could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Alias pattern failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A recipe slot is none of the recognized shapes
    #[error("Invalid recipe slot: {0}")]
    InvalidSlot(String),

    /// A dumped recipe carries neither generic nor machine data
    #[error("Recipe #{index} of handler '{handler}' has neither generic nor machine data")]
    MalformedRecipe { handler: String, index: usize },

    /// The dump document does not have the expected top-level structure
    #[error("Malformed dump: {0}")]
    MalformedDump(String),

    /// A required input file does not exist
    #[error("Required input {} does not exist", .0.display())]
    MissingInput(PathBuf),

    /// The filter configuration is inconsistent
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The input changed between hashing and parsing
    #[error("Input {} changed while it was being read", .0.display())]
    SourceChanged(PathBuf),

    /// The finished output could not be moved into place
    #[error("Failed to persist {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;
