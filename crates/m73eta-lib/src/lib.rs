//! Use slicer-embedded M73 remaining times as the print-time estimate.
//!
//! This is a facade crate that re-exports functionality from the m73eta
//! workspace crates and adds [`EtaPlugin`], which wires them together.
//!
//! # Quick Start
//!
//! ```ignore
//! use m73eta_lib::prelude::*;
//! use std::sync::Arc;
//!
//! let plugin = EtaPlugin::with_default_settings()?;
//! let estimator = plugin.estimator(LinearEstimator::new());
//!
//! plugin.on_gcode_sent("M73 P45 R120");
//! let estimate = estimator.estimate(&EstimateInputs::default());
//! assert_eq!(estimate, TimeEstimate::external(7200));
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/m73eta/m73eta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod plugin;

pub use plugin::EtaPlugin;

// Re-export core types
pub use m73eta_types::*;

// Re-export directive parsing
pub use m73eta_gcode::{
    DirectiveError, M73_KEYWORD, M73Line, Marker, RemainingTimeToken, minutes_to_seconds,
    parse_line,
};

// Re-export live estimation
pub use m73eta_estimate::{
    EstimateOverride, FallbackEstimator, LinearEstimator, LiveEstimateTracker,
    RemainingTimeReader, RemainingTimeWriter, remaining_time,
};

// Re-export settings
pub use m73eta_settings::{Settings, SettingsError, SettingsStore, SubscriptionId};

// Re-export pre-analysis
#[cfg(feature = "analysis")]
pub use m73eta_analysis::{
    AbortCheck, AbortSignal, AnalysisJobId, AnalysisQueue, BaseAnalyzer, DEFAULT_THROTTLE,
    FilePreAnalyzer, FinishedAnalysis, NoBaseAnalysis, QueueError, ScanPolicy,
};

/// Prelude module for convenient imports.
///
/// ```
/// use m73eta_lib::prelude::*;
/// ```
pub mod prelude {
    pub use crate::EtaPlugin;

    pub use m73eta_types::{
        AnalysisError, AnalysisOutcome, AnalysisResult, EstimateInputs, EtaError, PrintMode,
        Result, StatisticalTotalType, TimeEstimate,
    };

    pub use m73eta_estimate::{EstimateOverride, FallbackEstimator, LinearEstimator};

    pub use m73eta_settings::{Settings, SettingsStore};

    #[cfg(feature = "analysis")]
    pub use m73eta_analysis::{
        AbortSignal, AnalysisQueue, FilePreAnalyzer, FinishedAnalysis, NoBaseAnalysis,
        ScanPolicy,
    };
}
