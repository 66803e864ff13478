//! Core types for the m73eta print-time override.
//!
//! This crate provides the value types shared by the other m73eta crates:
//!
//! - [`PrintMode`] - Which `M73` remaining-time marker is authoritative
//! - [`AnalysisResult`] - Initial estimate produced by pre-analysing a file
//! - [`AnalysisOutcome`] - Completed, partial (aborted) or failed analysis
//! - [`TimeEstimate`] - A `(duration, label)` pair returned to the host
//! - [`EstimateInputs`] - Progress figures the host passes to its estimator

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/m73eta/m73eta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod analysis;
mod error;
mod estimate;
mod mode;

pub use analysis::{AnalysisOutcome, AnalysisResult};
pub use error::{AnalysisError, EtaError, Result};
pub use estimate::{EXTERNAL_ESTIMATE_LABEL, EstimateInputs, StatisticalTotalType, TimeEstimate};
pub use mode::{PrintMode, PrintModeParseError};
