//! Normal versus silent print mode.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which remaining-time marker of an `M73` directive is authoritative.
///
/// Prusa firmware reports two countdowns: `R` for the normal motor mode
/// and `S` for the quieter, slower stealth mode. Exactly one mode is active
/// at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrintMode {
    /// Only `R` values are honoured.
    #[default]
    Normal,
    /// `S` values are honoured as well and take precedence.
    Silent,
}

impl PrintMode {
    /// Builds the mode from the operator's "silent mode enabled" switch.
    #[must_use]
    pub const fn from_silent_enabled(silent_mode_enabled: bool) -> Self {
        if silent_mode_enabled {
            Self::Silent
        } else {
            Self::Normal
        }
    }

    /// Returns true if silent (`S`) values are honoured.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::Silent)
    }

    /// Returns the mode as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Silent => "silent",
        }
    }
}

impl std::fmt::Display for PrintMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PrintMode {
    type Err = PrintModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "n" | "r" => Ok(Self::Normal),
            "silent" | "stealth" | "s" => Ok(Self::Silent),
            _ => Err(PrintModeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid print mode string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintModeParseError(String);

impl std::fmt::Display for PrintModeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid print mode '{}', expected one of: normal, silent",
            self.0
        )
    }
}

impl std::error::Error for PrintModeParseError {}
