//! File pre-analysis results.

use crate::AnalysisError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Initial estimate extracted from an uploaded G-code file.
///
/// Serialized with the field names the host stores in its job metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Estimated print duration in whole seconds, if one was found.
    pub estimated_print_time: Option<u64>,
    /// True if the estimate was taken from a silent-mode (`S`) directive.
    pub silent_mode_detected: bool,
}

impl AnalysisResult {
    /// Creates a result carrying an estimate in seconds.
    #[must_use]
    pub const fn with_estimate(seconds: u64, silent_mode_detected: bool) -> Self {
        Self {
            estimated_print_time: Some(seconds),
            silent_mode_detected,
        }
    }

    /// Returns the estimate as a [`Duration`].
    #[must_use]
    pub fn estimated_duration(&self) -> Option<Duration> {
        self.estimated_print_time.map(Duration::from_secs)
    }
}

/// Outcome of a single pre-analysis call.
///
/// Aborting a scan is not a failure: it produces [`Partial`](Self::Partial)
/// with whatever had been accumulated, never [`Failed`](Self::Failed).
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The scan ran to its natural end.
    Completed(AnalysisResult),
    /// The scan was cancelled; the result is best-effort.
    Partial(AnalysisResult),
    /// The file could not be analysed.
    Failed(AnalysisError),
}

impl AnalysisOutcome {
    /// Returns the result for completed and partial outcomes.
    #[must_use]
    pub const fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Completed(result) | Self::Partial(result) => Some(result),
            Self::Failed(_) => None,
        }
    }

    /// Returns true if the scan was cut short by an abort request.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::Partial(_))
    }

    /// Returns the outcome as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Partial(_) => "partial",
            Self::Failed(_) => "failed",
        }
    }

    /// Converts into a plain `Result`, treating partial results as success.
    ///
    /// # Errors
    ///
    /// Returns the [`AnalysisError`] of a failed outcome.
    pub fn into_result(self) -> Result<AnalysisResult, AnalysisError> {
        match self {
            Self::Completed(result) | Self::Partial(result) => Ok(result),
            Self::Failed(e) => Err(e),
        }
    }
}
