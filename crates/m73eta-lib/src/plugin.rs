//! Host-facing plugin wiring.

use m73eta_estimate::{
    EstimateOverride, FallbackEstimator, LiveEstimateTracker, RemainingTimeReader, remaining_time,
};
use m73eta_settings::{SettingsStore, SubscriptionId};
use m73eta_types::{PrintMode, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

#[cfg(feature = "analysis")]
use m73eta_analysis::{AbortCheck, BaseAnalyzer, FilePreAnalyzer};
#[cfg(feature = "analysis")]
use m73eta_types::AnalysisOutcome;
#[cfg(feature = "analysis")]
use std::path::Path;

/// The plugin instance a printer host keeps for its lifetime.
///
/// Owns the remaining-time cell and its only writer. The silent-mode
/// switch is cached and refreshed through a settings subscription, which
/// is removed again when the plugin is dropped.
#[derive(Debug)]
pub struct EtaPlugin {
    settings: Arc<SettingsStore>,
    silent_mode: Arc<AtomicBool>,
    subscription: SubscriptionId,
    tracker: LiveEstimateTracker,
}

impl EtaPlugin {
    /// Creates the plugin on top of an opened settings store.
    #[must_use]
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        let silent_mode = Arc::new(AtomicBool::new(settings.silent_mode_enabled()));

        let cached = Arc::clone(&silent_mode);
        let subscription = settings.subscribe(move |settings| {
            cached.store(settings.silent_mode_enabled, Ordering::Relaxed);
            info!(mode = %settings.print_mode(), "Print mode changed");
        });

        let (writer, _) = remaining_time();

        Self {
            settings,
            silent_mode,
            subscription,
            tracker: LiveEstimateTracker::new(writer),
        }
    }

    /// Creates the plugin with settings from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be loaded.
    pub fn with_default_settings() -> Result<Self> {
        let settings = SettingsStore::with_default_path()?;
        Ok(Self::new(Arc::new(settings)))
    }

    /// Returns the settings store.
    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Returns the mode selected by the operator.
    #[must_use]
    pub fn print_mode(&self) -> PrintMode {
        PrintMode::from_silent_enabled(self.silent_mode.load(Ordering::Relaxed))
    }

    /// Hook for every instruction sent to the printer.
    ///
    /// Returns the number of remaining-time values taken from the line.
    pub fn on_gcode_sent(&self, line: &str) -> usize {
        self.tracker.observe(line, self.print_mode())
    }

    /// Hook for the start of a print job.
    ///
    /// Drops the previous job's remaining time so the host's estimator is
    /// used until the new file reports its own.
    pub fn on_print_started(&self) {
        debug!("Print started, clearing remaining time");
        self.tracker.reset();
    }

    /// Returns a reader of the current remaining time.
    #[must_use]
    pub fn remaining(&self) -> RemainingTimeReader {
        self.tracker.reader()
    }

    /// Builds the estimator the host should use in place of its own.
    ///
    /// Any number of estimators may exist; they all read the same value.
    #[must_use]
    pub fn estimator<F: FallbackEstimator>(&self, fallback: F) -> EstimateOverride<F> {
        EstimateOverride::new(self.tracker.reader(), fallback)
    }

    /// Pre-analyses an uploaded file in the operator's current mode.
    #[cfg(feature = "analysis")]
    pub fn analyze<B, A>(
        &self,
        analyzer: &FilePreAnalyzer<B>,
        path: &Path,
        high_priority: bool,
        abort: &A,
    ) -> AnalysisOutcome
    where
        B: BaseAnalyzer,
        A: AbortCheck,
    {
        analyzer.analyze(path, high_priority, self.print_mode(), abort)
    }
}

impl Drop for EtaPlugin {
    fn drop(&mut self) {
        self.settings.unsubscribe(self.subscription);
    }
}
