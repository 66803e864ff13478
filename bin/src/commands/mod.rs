//! CLI command implementations.

pub(crate) mod analyze;
pub(crate) mod config;
pub(crate) mod replay;
