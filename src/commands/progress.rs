// src/commands/progress.rs
//! Terminal progress display for the pipeline steps
//!
//! Wraps an indicatif bar behind the library's `ProgressTracker` trait. The
//! dump pass doesn't know its total and shows a spinner with a counter; once
//! a length is set the spinner turns into a bar.

use indicatif::{ProgressBar, ProgressStyle};
use nerd_converter::progress::{LogProgress, ProgressTracker};
use std::time::Duration;

/// indicatif-backed progress tracker
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Spinner for a pass of unknown length
    pub fn spinner(step: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {prefix}: {msg} ({pos} recipes, {per_sec})")
                .expect("Invalid spinner template"),
        );
        bar.set_prefix(step.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix}: {msg} ({pos}/{len}) [{bar:40.green/dim}] {percent}%")
            .expect("Invalid progress bar template")
            .progress_chars("##-")
    }
}

impl ProgressTracker for CliProgress {
    fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    fn set_length(&self, length: u64) {
        if length > 0 && self.bar.length().is_none() {
            self.bar.set_style(Self::bar_style());
        }
        self.bar.set_length(length);
    }

    fn position(&self) -> u64 {
        self.bar.position()
    }

    fn length(&self) -> u64 {
        self.bar.length().unwrap_or(0)
    }

    fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    fn finish_with_error(&self, message: &str) {
        self.bar.abandon_with_message(format!("FAILED: {}", message));
    }

    fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

/// Pick the tracker for a step
pub fn step_progress(step: &str, plain: bool) -> Box<dyn ProgressTracker> {
    if plain {
        Box::new(LogProgress::new(step, 0).with_log_interval(10_000))
    } else {
        Box::new(CliProgress::spinner(step))
    }
}
