//! Live remaining-time tracking and estimate override for m73eta.
//!
//! - [`remaining_time`] - Creates the shared remaining-time cell
//! - [`RemainingTimeWriter`] / [`RemainingTimeReader`] - Its two handles
//! - [`LiveEstimateTracker`] - Updates the cell from sent `M73` directives
//! - [`EstimateOverride`] - Answers estimate requests from the cell
//! - [`FallbackEstimator`] - The host estimator used while no value is known
//! - [`LinearEstimator`] - A simple fallback for standalone use

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/m73eta/m73eta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod estimator;
mod fallback;
mod remaining;
mod tracker;

pub use estimator::EstimateOverride;
pub use fallback::{FallbackEstimator, LinearEstimator};
pub use remaining::{RemainingTimeReader, RemainingTimeWriter, remaining_time};
pub use tracker::LiveEstimateTracker;
