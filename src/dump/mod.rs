// src/dump/mod.rs

//! Reading the recipe-inspector dump
//!
//! - [`format`]: serde shapes of queries, handlers and dumped recipes
//! - [`reader`]: streaming iterator over the `queries` array
//! - [`stacks`]: the item/fluid registry that accompanies the dump

pub mod format;
pub mod reader;
pub mod stacks;

pub use format::{DumpedRecipe, GenericRecipe, HandlerDump, MachineRecipe, QueryDump, RecipeData};
pub use reader::DumpReader;
pub use stacks::{FluidInfo, ItemInfo, StackRegistry};
