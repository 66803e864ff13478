//! Analyze command implementation.
//!
//! Runs files through the background analysis queue and prints the initial
//! estimate found for each. Ctrl-C aborts the file currently being scanned.

use crate::display::{analysis_json, analysis_line};
use anyhow::{Context, Result};
use m73eta_lib::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Analyse G-code files in the given mode.
pub(crate) async fn analyze(
    files: &[PathBuf],
    mode: PrintMode,
    high_priority: bool,
    first_match: bool,
    json: bool,
) -> Result<()> {
    let policy = if first_match {
        ScanPolicy::FirstMatch
    } else {
        ScanPolicy::AwaitBoth
    };
    let analyzer = Arc::new(FilePreAnalyzer::new(NoBaseAnalysis).with_policy(policy));
    let (queue, mut finished) = AnalysisQueue::spawn(analyzer);

    info!(%mode, %policy, files = files.len(), "Analysing files");

    for file in files {
        let path = std::path::absolute(file)
            .with_context(|| format!("Invalid path: {}", file.display()))?;
        queue
            .enqueue(path, high_priority, mode)
            .context("Failed to queue analysis")?;
    }

    let mut pending = files.len();
    let mut failed = 0usize;

    while pending > 0 {
        tokio::select! {
            done = finished.recv() => {
                let Some(done) = done else {
                    break;
                };
                pending -= 1;
                if matches!(done.outcome, AnalysisOutcome::Failed(_)) {
                    failed += 1;
                }

                if json {
                    println!("{}", analysis_json(&done));
                } else {
                    println!("{}", analysis_line(&done));
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                if queue.abort_current().is_none() {
                    warn!("Nothing to abort");
                }
            }
        }
    }

    queue.shutdown().await;

    if failed > 0 {
        anyhow::bail!("{failed} of {} files could not be analysed", files.len());
    }

    Ok(())
}
