// src/config.rs

//! Converter configuration and data directory layout

use crate::error::{Error, Result};
use crate::filter::config::FilterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Dump produced by the recipe inspector
pub const RECIPES_INPUT_FILENAME: &str = "recipes.json";
/// Item/fluid registry written alongside the dump
pub const STACKS_FILENAME: &str = "recipes_stacks.json";
pub const OREDICT_FILENAME: &str = "oredict.csv";
pub const HANDLERS_FILENAME: &str = "handlers.csv";
pub const RECIPES_PREPROCESSED_FILENAME: &str = "recipes_preprocessed.json";
pub const RECIPES_FILTERED_FILENAME: &str = "recipes_filtered.json";

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub filter: FilterConfig,
}

impl Config {
    /// Load a config file
    ///
    /// Files ending in `.toml` are read as TOML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let config: Config = if is_toml {
            toml::from_str(&text)?
        } else {
            serde_json::from_str(&text)?
        };
        config.filter.validate()?;

        debug!(
            "Loaded config from {}: {} exclusion rules",
            path.display(),
            config.filter.exclude_recipes.len()
        );
        Ok(config)
    }
}

/// Where each pipeline file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    /// Inputs exported from the game
    pub data_dir: PathBuf,
    /// Files produced by the converter
    pub output_dir: PathBuf,
}

impl DataLayout {
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn dump(&self) -> PathBuf {
        self.data_dir.join(RECIPES_INPUT_FILENAME)
    }

    pub fn stacks(&self) -> PathBuf {
        self.data_dir.join(STACKS_FILENAME)
    }

    pub fn oredict(&self) -> PathBuf {
        self.data_dir.join(OREDICT_FILENAME)
    }

    pub fn handlers(&self) -> PathBuf {
        self.data_dir.join(HANDLERS_FILENAME)
    }

    pub fn preprocessed(&self) -> PathBuf {
        self.output_dir.join(RECIPES_PREPROCESSED_FILENAME)
    }

    pub fn filtered(&self) -> PathBuf {
        self.output_dir.join(RECIPES_FILTERED_FILENAME)
    }
}
