//! Fallback estimators consulted while no directive has been seen.

use m73eta_types::{EstimateInputs, TimeEstimate};
use std::time::Duration;

/// The host's own print-time estimator.
///
/// Implemented for any `Fn(&EstimateInputs) -> TimeEstimate`, so a host
/// can hand over a closure wrapping its default estimator.
pub trait FallbackEstimator {
    /// Estimates the remaining print time.
    fn estimate(&self, inputs: &EstimateInputs) -> TimeEstimate;
}

impl<F> FallbackEstimator for F
where
    F: Fn(&EstimateInputs) -> TimeEstimate,
{
    fn estimate(&self, inputs: &EstimateInputs) -> TimeEstimate {
        self(inputs)
    }
}

/// Estimates from print history when available, else from progress.
///
/// Uses the statistical total minus cleaned elapsed time when the host has
/// one, otherwise extrapolates linearly from the completed fraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearEstimator;

impl LinearEstimator {
    /// Label used for linear extrapolation.
    pub const LINEAR_LABEL: &'static str = "linear";

    /// Creates a linear estimator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FallbackEstimator for LinearEstimator {
    fn estimate(&self, inputs: &EstimateInputs) -> TimeEstimate {
        if let Some(total) = inputs.statistical_total {
            let label = inputs
                .statistical_total_type
                .map_or(Self::LINEAR_LABEL, |t| t.as_str());
            return TimeEstimate::new(Some(total.saturating_sub(inputs.cleaned_elapsed)), label);
        }

        let progress = inputs.progress;
        if !progress.is_finite() || progress <= 0.0 {
            return TimeEstimate::new(None, Self::LINEAR_LABEL);
        }

        let remaining = Duration::try_from_secs_f64(
            inputs.cleaned_elapsed.as_secs_f64() / progress.min(1.0),
        )
        .ok()
        .map(|total| total.saturating_sub(inputs.cleaned_elapsed));

        TimeEstimate::new(remaining, Self::LINEAR_LABEL)
    }
}
