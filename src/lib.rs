// src/lib.rs

//! NERD recipe converter
//!
//! Converts the JSON recipe dump of an in-game recipe inspector into a
//! compact, de-duplicated recipe catalog, then filters that catalog down to
//! the machines and recipes a production planner should see.
//!
//! # Pipeline
//!
//! - Preprocess: stream the dump, normalize slots into stacks, aggregate and
//!   de-duplicate recipes, write `recipes_preprocessed.json`
//! - Filter: drop recipes of unwanted handlers and recipes matching
//!   exclusion rules on oredict aliases, write `recipes_filtered.json`
//!
//! Each output records the SHA-256 of its input, so re-running a step on
//! unchanged input is a no-op.

pub mod cache;
pub mod config;
pub mod dump;
mod error;
pub mod filter;
pub mod hash;
pub mod progress;
pub mod recipe;
pub mod stack;
pub mod steps;

pub use cache::{is_up_to_date, CacheStatus};
pub use config::{Config, DataLayout};
pub use dump::{DumpReader, QueryDump, StackRegistry};
pub use error::{Error, Result};
pub use filter::{AliasTable, FilterConfig, FilterEngine, FilterReport};
pub use hash::{ContentHash, Hasher, HashingReader};
pub use progress::{CallbackProgress, LogProgress, ProgressEvent, ProgressTracker, SilentProgress};
pub use recipe::{Recipe, RecipeAggregator, RecipeFile, RecipeMeta, RecipeSet};
pub use stack::{group_and_sum, Amount, Stack, StackKind};
pub use steps::{filter_recipes, preprocess_recipes, StepOutcome};
