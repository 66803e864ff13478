//! M73 remaining-time directive parsing for m73eta.
//!
//! Slicers embed their own print-time countdown in the G-code through the
//! `M73` "set progress" command:
//!
//! ```text
//! M73 P45 R120 Q44 S131
//! ```
//!
//! `P`/`Q` are percentages and are ignored here; `R` and `S` carry the
//! remaining minutes for normal and silent mode respectively.
//!
//! - [`parse_line`] - Recognises an `M73` line and yields an [`M73Line`]
//! - [`RemainingTimeToken`] - One parsed `R`/`S` marker
//! - [`Marker`] - Normal (`R`) or silent (`S`)
//! - [`DirectiveError`] - Per-token parse failure

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/m73eta/m73eta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod directive;
mod token;

pub use directive::{M73_KEYWORD, M73Line, parse_line};
pub use token::{DirectiveError, Marker, RemainingTimeToken, minutes_to_seconds};
