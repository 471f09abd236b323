// src/recipe/mod.rs

//! Normalized recipes
//!
//! A recipe in the converter's own format is a list of input stacks, a list
//! of output stacks and the machine (handler) that performs it:
//!
//! - [`slot`]: raw dump slots to [`Stack`](crate::stack::Stack)s
//! - [`aggregate`]: dumped entries to a de-duplicated [`RecipeSet`]
//! - [`format`]: the recipe catalog file both pipeline steps read and write
//!
//! Two recipes are the same recipe when their inputs, outputs and machine
//! match. Power and duration are carried along but ignored for identity, so
//! variants that only differ in timing collapse into one.

pub mod aggregate;
pub mod format;
pub mod slot;

pub use aggregate::RecipeAggregator;
pub use format::{discard_output, Recipe, RecipeFile, RecipeKey, RecipeMeta, RecipeSet};
pub use slot::{normalize, stacks_from_slots, RawSlot, CHANCE_SCALE};
