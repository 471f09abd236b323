// src/recipe/format.rs

//! Recipe catalog format
//!
//! Both the preprocessed and the filtered catalog share one shape:
//!
//! ```json
//! {
//!   "dump_version": "1.4.2",
//!   "dump_sha": "<sha256 of the file this was derived from>",
//!   "recipes": [
//!     {
//!       "inputs": [{"type": "item", "slug": "i22d0", "amount": 4}],
//!       "outputs": [{"type": "item", "slug": "i58d0", "amount": 1}],
//!       "machine": "Crafting Table",
//!       "meta": null
//!     }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::stack::{Amount, Stack, StackKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Power and timing of a machine recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeMeta {
    /// Power draw per tick
    #[serde(rename = "EUt", alias = "power")]
    pub power: i64,
    /// Duration in ticks
    #[serde(rename = "ticks", alias = "duration")]
    pub duration: i64,
}

/// A normalized recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub inputs: Vec<Stack>,
    pub outputs: Vec<Stack>,
    /// Crafting method or handler, e.g. "Shaped Crafting" or "Assembler"
    pub machine: String,
    #[serde(default)]
    pub meta: Option<RecipeMeta>,
}

impl Recipe {
    pub fn new(inputs: Vec<Stack>, outputs: Vec<Stack>, machine: impl Into<String>) -> Self {
        Self {
            inputs,
            outputs,
            machine: machine.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: RecipeMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Identity of this recipe for deduplication
    pub fn key(&self) -> RecipeKey {
        RecipeKey::of(self)
    }
}

/// Canonical identity of a recipe: its stacks (with amounts) and machine
///
/// `meta` is not part of the key, so recipes that differ only in power or
/// duration are the same recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeKey {
    inputs: Vec<(StackKind, String, Amount)>,
    outputs: Vec<(StackKind, String, Amount)>,
    machine: String,
}

impl RecipeKey {
    pub fn of(recipe: &Recipe) -> Self {
        let entries = |stacks: &[Stack]| -> Vec<(StackKind, String, Amount)> {
            stacks
                .iter()
                .map(|s| (s.kind, s.slug.clone(), s.amount))
                .collect()
        };
        Self {
            inputs: entries(&recipe.inputs),
            outputs: entries(&recipe.outputs),
            machine: recipe.machine.clone(),
        }
    }
}

/// Insertion-ordered set of recipes keyed by [`RecipeKey`]
///
/// The first recipe inserted for a key is the one kept.
#[derive(Debug, Default)]
pub struct RecipeSet {
    keys: HashSet<RecipeKey>,
    recipes: Vec<Recipe>,
}

impl RecipeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a recipe, returning false if an identical one was already present
    pub fn insert(&mut self, recipe: Recipe) -> bool {
        if self.keys.insert(recipe.key()) {
            self.recipes.push(recipe);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    pub fn into_vec(self) -> Vec<Recipe> {
        self.recipes
    }
}

impl Extend<Recipe> for RecipeSet {
    fn extend<I: IntoIterator<Item = Recipe>>(&mut self, iter: I) {
        for recipe in iter {
            self.insert(recipe);
        }
    }
}

impl FromIterator<Recipe> for RecipeSet {
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        let mut set = RecipeSet::new();
        set.extend(iter);
        set
    }
}

/// A recipe catalog with the provenance of its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFile {
    pub dump_version: String,
    /// SHA-256 of the input file this catalog was produced from
    pub dump_sha: String,
    pub recipes: Vec<Recipe>,
}

impl RecipeFile {
    pub fn new(dump_version: impl Into<String>, dump_sha: impl Into<String>, recipes: Vec<Recipe>) -> Self {
        Self {
            dump_version: dump_version.into(),
            dump_sha: dump_sha.into(),
            recipes,
        }
    }

    /// Parse a catalog from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Load a catalog from a file
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// Write the catalog so that readers only ever see a complete file
    ///
    /// The JSON is written to a temp file in the destination directory and
    /// renamed over `path` once flushed. If anything fails the temp file is
    /// removed and `path` is left untouched.
    pub fn save_atomic(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| Error::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        debug!("Wrote {} recipes to {}", self.recipes.len(), path.display());
        Ok(())
    }
}

/// Remove a stale output so it can't be mistaken for a fresh result
pub fn discard_output(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
