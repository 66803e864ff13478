//! Uploaded G-code pre-analysis for m73eta.
//!
//! - [`FilePreAnalyzer`] - Seeds an initial estimate from a file's `M73` lines
//! - [`ScanPolicy`] - When a silent-mode scan may stop
//! - [`BaseAnalyzer`] - The host's own analysis step, run first
//! - [`AbortSignal`] / [`AbortCheck`] - Cooperative cancellation
//! - [`AnalysisQueue`] - Serial background queue running analyses on tokio

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/m73eta/m73eta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod abort;
mod analyzer;
mod base;
mod queue;

pub use abort::{AbortCheck, AbortSignal};
pub use analyzer::{DEFAULT_THROTTLE, FilePreAnalyzer, ScanPolicy};
pub use base::{BaseAnalyzer, NoBaseAnalysis};
pub use queue::{AnalysisJobId, AnalysisQueue, FinishedAnalysis, QueueError};
