//! Estimate override.

use crate::{FallbackEstimator, RemainingTimeReader};
use m73eta_types::{EstimateInputs, TimeEstimate};

/// Replaces the host's estimate with the latest `M73` remaining time.
///
/// Holds the host's estimator by composition and delegates to it, with the
/// inputs untouched, until a directive has been observed. Reads are a
/// single atomic load, so the host may poll this as often as it likes.
#[derive(Debug, Clone)]
pub struct EstimateOverride<F> {
    remaining: RemainingTimeReader,
    fallback: F,
}

impl<F: FallbackEstimator> EstimateOverride<F> {
    /// Creates an override reading `remaining` and delegating to `fallback`.
    #[must_use]
    pub const fn new(remaining: RemainingTimeReader, fallback: F) -> Self {
        Self {
            remaining,
            fallback,
        }
    }

    /// Returns the remaining print time.
    ///
    /// `(remaining, "estimate")` once a directive was seen, otherwise
    /// exactly what the fallback returns.
    #[must_use]
    pub fn estimate(&self, inputs: &EstimateInputs) -> TimeEstimate {
        self.remaining
            .seconds()
            .map_or_else(|| self.fallback.estimate(inputs), TimeEstimate::external)
    }

    /// Returns the fallback estimator.
    #[must_use]
    pub const fn fallback(&self) -> &F {
        &self.fallback
    }
}
