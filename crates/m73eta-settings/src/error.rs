//! Settings errors.

use m73eta_types::EtaError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or storing settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read the settings file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the settings file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the settings file.
    #[error("Failed to parse settings file '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize settings.
    #[error("Failed to serialize settings: {0}")]
    SerializeJson(#[from] serde_json::Error),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

impl From<SettingsError> for EtaError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(Box::new(e))
    }
}
