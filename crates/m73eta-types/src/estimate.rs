//! Print-time estimate exchanged with the host.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;

/// Label attached to estimates that came from an `M73` directive.
pub const EXTERNAL_ESTIMATE_LABEL: &str = "estimate";

/// Where the host's statistical total print time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticalTotalType {
    /// Average of previous prints of the same file.
    Average,
    /// Linear extrapolation from previous prints.
    Linear,
}

impl StatisticalTotalType {
    /// Returns the type as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Linear => "linear",
        }
    }
}

impl std::fmt::Display for StatisticalTotalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Figures the host hands to its estimator on every progress update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EstimateInputs {
    /// Fraction of the job completed, `0.0..=1.0`.
    pub progress: f64,
    /// Wall-clock time since the print started.
    pub elapsed: Duration,
    /// Elapsed time minus heat-up and other non-printing phases.
    pub cleaned_elapsed: Duration,
    /// Total print time derived from previous prints, if any.
    pub statistical_total: Option<Duration>,
    /// Origin of [`statistical_total`](Self::statistical_total).
    pub statistical_total_type: Option<StatisticalTotalType>,
}

impl EstimateInputs {
    /// Creates inputs without any statistical history.
    #[must_use]
    pub const fn new(progress: f64, elapsed: Duration, cleaned_elapsed: Duration) -> Self {
        Self {
            progress,
            elapsed,
            cleaned_elapsed,
            statistical_total: None,
            statistical_total_type: None,
        }
    }

    /// Attaches a statistical total and its origin.
    #[must_use]
    pub const fn with_statistical_total(
        mut self,
        total: Duration,
        total_type: StatisticalTotalType,
    ) -> Self {
        self.statistical_total = Some(total);
        self.statistical_total_type = Some(total_type);
        self
    }
}

/// A remaining-time estimate and the label describing its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEstimate {
    /// Remaining print time, or `None` if it cannot be estimated yet.
    pub remaining: Option<Duration>,
    /// Origin of the estimate (`"estimate"`, `"linear"`, ...).
    pub label: Cow<'static, str>,
}

impl TimeEstimate {
    /// Creates an estimate.
    #[must_use]
    pub fn new(remaining: Option<Duration>, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            remaining,
            label: label.into(),
        }
    }

    /// Creates an estimate taken from an `M73` directive.
    #[must_use]
    pub const fn external(seconds: u64) -> Self {
        Self {
            remaining: Some(Duration::from_secs(seconds)),
            label: Cow::Borrowed(EXTERNAL_ESTIMATE_LABEL),
        }
    }

    /// Returns true if the estimate came from an `M73` directive.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.label == EXTERNAL_ESTIMATE_LABEL
    }
}
