//! Error types for m73eta.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for m73eta operations.
pub type Result<T> = std::result::Result<T, EtaError>;

/// Errors that can occur while wiring the plugin together.
#[derive(Error, Debug)]
pub enum EtaError {
    /// Operator configuration could not be loaded or stored.
    #[error("Settings error: {0}")]
    Settings(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Unrecoverable failure of a single file pre-analysis.
///
/// Cancellation is never reported through this type; an aborted scan
/// yields a partial [`AnalysisResult`](crate::AnalysisResult) instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The file could not be opened.
    #[error("Failed to open '{path}': {source}")]
    Open {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Reading from an opened file failed.
    #[error("Failed to read '{path}': {source}")]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The base analysis step reported a failure.
    #[error("Base analysis of '{path}' failed: {reason}")]
    Base {
        /// The file being analysed.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },
}

impl AnalysisError {
    /// Returns the path of the file the failure relates to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } | Self::Base { path, .. } => path,
        }
    }
}
