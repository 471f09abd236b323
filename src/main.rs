// src/main.rs

mod cli;
mod commands;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, PipelineStep, Step};
use nerd_converter::DataLayout;
use std::fs;
use tracing::{error, info};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Welcome to the NERD Converter!");

    if !cli.data_dir.is_dir() {
        bail!("Data directory {} not found", cli.data_dir.display());
    }
    fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!("Failed to create output directory {}", cli.output_dir.display())
    })?;
    let layout = DataLayout::new(&cli.data_dir, &cli.output_dir);

    for step in Step::plan(&cli.steps) {
        info!("Running step: {}", step);
        let result = match step {
            PipelineStep::Preprocess => commands::cmd_preprocess(&layout, cli.no_progress),
            PipelineStep::Filter => commands::cmd_filter(&layout, &cli.config, cli.no_progress),
        };
        if let Err(e) = result {
            error!("Step {} failed", step);
            return Err(e.context(format!("Step {} failed", step)));
        }
    }

    println!("All steps completed successfully!");
    Ok(())
}
