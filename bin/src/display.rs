//! Display utilities and output formatting for the m73eta CLI.

use chrono::{DateTime, Local};
use m73eta_lib::prelude::*;
use serde_json::{Value, json};
use std::time::Duration;

/// Formats duration in human-readable form (e.g., "2h 30m", "45m").
pub(crate) fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{hours}h")
        }
    } else if minutes > 0 {
        if seconds > 0 && minutes < 10 {
            format!("{minutes}m {seconds}s")
        } else {
            format!("{minutes}m")
        }
    } else {
        format!("{seconds}s")
    }
}

/// Wall-clock time at which `remaining` runs out, counted from `now`.
pub(crate) fn finish_time(now: DateTime<Local>, remaining: Duration) -> Option<DateTime<Local>> {
    chrono::Duration::from_std(remaining)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
}

/// One-line description of an estimate for the progress bar.
pub(crate) fn describe_estimate(estimate: &TimeEstimate) -> String {
    estimate.remaining.map_or_else(
        || format!("no estimate yet ({})", estimate.label),
        |remaining| {
            let finish = finish_time(Local::now(), remaining)
                .map_or_else(String::new, |at| format!(", done at {}", at.format("%H:%M:%S")));
            format!("{} left ({}){finish}", format_duration(remaining), estimate.label)
        },
    )
}

/// Human-readable line for a finished analysis.
pub(crate) fn analysis_line(finished: &FinishedAnalysis) -> String {
    let path = finished.path.display();

    match &finished.outcome {
        AnalysisOutcome::Failed(e) => format!("{path}: failed: {e}"),
        outcome => {
            let result = outcome.result().copied().unwrap_or_default();
            let estimate = result
                .estimated_duration()
                .map_or_else(|| "no estimate".to_string(), format_duration);
            let silent = if result.silent_mode_detected {
                " (silent)"
            } else {
                ""
            };
            let partial = if outcome.is_partial() {
                " [aborted]"
            } else {
                ""
            };
            format!("{path}: {estimate}{silent}{partial}")
        }
    }
}

/// JSON object for a finished analysis.
pub(crate) fn analysis_json(finished: &FinishedAnalysis) -> Value {
    let mut value = json!({
        "id": finished.id.to_string(),
        "path": finished.path,
        "mode": finished.mode,
        "outcome": finished.outcome.as_str(),
    });

    match &finished.outcome {
        AnalysisOutcome::Failed(e) => value["error"] = json!(e.to_string()),
        outcome => {
            if let Some(result) = outcome.result() {
                value["result"] = json!(result);
            }
        }
    }

    value
}
