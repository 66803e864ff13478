//! Operator configuration for m73eta.
//!
//! - [`Settings`] - The persisted options
//! - [`SettingsStore`] - Loads, stores and publishes changes to [`Settings`]
//! - [`SubscriptionId`] - Handle of a registered change callback
//! - [`SettingsError`] - Errors while loading or storing settings

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/m73eta/m73eta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod coerce;
mod error;
mod settings;
mod store;

pub use error::{Result, SettingsError};
pub use settings::Settings;
pub use store::{SettingsStore, SubscriptionId};
