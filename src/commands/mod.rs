// src/commands/mod.rs
//! Command handlers for the NERD converter CLI

mod filter;
mod preprocess;
pub mod progress;

pub use filter::cmd_filter;
pub use preprocess::cmd_preprocess;
