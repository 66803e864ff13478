//! Replay command implementation.
//!
//! Feeds a file line by line through the plugin, the way a host would while
//! sending it to the printer, and shows the estimate the host would display.

use crate::display::describe_estimate;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use m73eta_lib::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Replay a G-code file through the live tracker.
pub(crate) async fn replay(
    settings: Arc<SettingsStore>,
    file: &Path,
    every: u64,
    delay_ms: u64,
    quiet: bool,
) -> Result<()> {
    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let content = String::from_utf8_lossy(&content);
    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len() as u64;

    let plugin = EtaPlugin::new(settings);
    let estimator = plugin.estimator(LinearEstimator::new());
    plugin.on_print_started();
    debug!(mode = %plugin.print_mode(), lines = total, "Replaying file");

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines {msg}")?
                .progress_chars("=>-"),
        );
        pb
    };

    let delay = Duration::from_millis(delay_ms);
    let started = Instant::now();
    let mut directives = 0usize;
    let mut estimate = estimator.estimate(&EstimateInputs::default());

    for (sent, line) in (1..=total).zip(&lines) {
        directives += plugin.on_gcode_sent(line);

        if sent % every == 0 || sent == total {
            let elapsed = started.elapsed();
            let inputs = EstimateInputs::new(sent as f64 / total as f64, elapsed, elapsed);
            estimate = estimator.estimate(&inputs);
            progress.set_message(describe_estimate(&estimate));
        }
        progress.set_position(sent);

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    progress.finish_with_message(format!("{directives} remaining-time values applied"));

    if !quiet {
        println!("Final estimate: {}", describe_estimate(&estimate));
    }

    Ok(())
}
