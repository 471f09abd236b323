// src/cli/mod.rs
//! CLI definitions for the NERD converter
//!
//! The converter runs a fixed pipeline of steps; `--step` picks a subset.
//! Selected steps always run in pipeline order, whatever order they are
//! given in. The command implementations are in the `commands` module.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nerd-converter")]
#[command(version)]
#[command(about = "Convert recipe dumps to NERD format via a series of steps", long_about = None)]
pub struct Cli {
    /// Directory holding the dump, stacks registry, oredict and handler tables
    #[arg(short = 'd', long = "data-dir", alias = "data_dir", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory the generated recipe files are written to
    #[arg(short = 'o', long = "output-dir", alias = "output_dir", default_value = "output")]
    pub output_dir: PathBuf,

    /// Config file (JSON, or TOML with a .toml extension)
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Steps to run; may be repeated
    #[arg(short, long = "step", value_enum, default_values_t = [Step::All])]
    pub steps: Vec<Step>,

    /// Log progress lines instead of drawing progress bars
    #[arg(long)]
    pub no_progress: bool,
}

/// A step selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Step {
    /// Turn the raw dump into the de-duplicated recipe catalog
    Preprocess,
    /// Filter the catalog by handler and exclusion rules
    Filter,
    /// Every step
    All,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Preprocess => "preprocess",
            Self::Filter => "filter",
            Self::All => "all",
        }
    }

    /// Expand a selection into the concrete steps to run, in pipeline order
    pub fn plan(selected: &[Step]) -> Vec<PipelineStep> {
        if selected.is_empty() || selected.contains(&Step::All) {
            return PipelineStep::ALL.to_vec();
        }
        PipelineStep::ALL
            .into_iter()
            .filter(|step| selected.contains(&step.selection()))
            .collect()
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A step that actually runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Preprocess,
    Filter,
}

impl PipelineStep {
    /// Steps in the order they must run
    pub const ALL: [PipelineStep; 2] = [PipelineStep::Preprocess, PipelineStep::Filter];

    /// The command line selection naming this step
    pub fn selection(self) -> Step {
        match self {
            Self::Preprocess => Step::Preprocess,
            Self::Filter => Step::Filter,
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.selection().name())
    }
}
