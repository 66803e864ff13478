//! Persisted plugin options.

use crate::coerce;
use m73eta_types::PrintMode;
use serde::{Deserialize, Serialize};

/// Options the operator can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Honour silent-mode (`S`) remaining times in addition to normal ones.
    #[serde(default, deserialize_with = "coerce::bool_from_any")]
    pub silent_mode_enabled: bool,
}

impl Settings {
    /// Returns the print mode selected by these settings.
    #[must_use]
    pub const fn print_mode(&self) -> PrintMode {
        PrintMode::from_silent_enabled(self.silent_mode_enabled)
    }
}
