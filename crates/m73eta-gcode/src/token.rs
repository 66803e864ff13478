//! Remaining-time marker tokens.

use m73eta_types::PrintMode;
use thiserror::Error;

/// Seconds per minute, the only unit conversion the directive needs.
const SECONDS_PER_MINUTE: u64 = 60;

/// Errors for a single malformed `R`/`S` token.
///
/// These are recoverable: the offending token is skipped and the rest of
/// the directive is still processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    /// Marker without any digits (e.g. `R`).
    #[error("Missing value after '{marker}' in token '{token}'")]
    MissingValue {
        /// The marker character.
        marker: char,
        /// The offending token.
        token: String,
    },

    /// Value contains something other than ASCII digits (e.g. `R12a`, `R-5`).
    #[error("Invalid digits in token '{token}'")]
    InvalidDigits {
        /// The offending token.
        token: String,
    },

    /// Value does not fit once converted to seconds.
    #[error("Value out of range in token '{token}'")]
    Overflow {
        /// The offending token.
        token: String,
    },
}

/// Which countdown a remaining-time token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `R`: remaining minutes in normal mode.
    Normal,
    /// `S`: remaining minutes in silent mode.
    Silent,
}

impl Marker {
    /// Returns the marker for a leading token character, if it is one.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'R' => Some(Self::Normal),
            'S' => Some(Self::Silent),
            _ => None,
        }
    }

    /// Returns the marker character.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Self::Normal => 'R',
            Self::Silent => 'S',
        }
    }

    /// Returns true if values with this marker are honoured in `mode`.
    ///
    /// Normal values are always honoured; silent values only in silent mode.
    #[must_use]
    pub const fn is_honoured_in(&self, mode: PrintMode) -> bool {
        match self {
            Self::Normal => true,
            Self::Silent => mode.is_silent(),
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A successfully parsed `R<minutes>` or `S<minutes>` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingTimeToken {
    /// Which countdown the value belongs to.
    pub marker: Marker,
    /// Remaining minutes as written in the directive.
    pub minutes: u64,
    /// Remaining time converted to seconds.
    pub seconds: u64,
}

impl RemainingTimeToken {
    /// Parses a single whitespace-separated token.
    ///
    /// Returns `None` for tokens that are not remaining-time markers
    /// (`P45`, `Q44`, ...), otherwise the parse result for this token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Result<Self, DirectiveError>> {
        let mut chars = token.chars();
        let marker = Marker::from_char(chars.next()?)?;
        Some(Self::parse_value(marker, token, chars.as_str()))
    }

    fn parse_value(marker: Marker, token: &str, digits: &str) -> Result<Self, DirectiveError> {
        if digits.is_empty() {
            return Err(DirectiveError::MissingValue {
                marker: marker.as_char(),
                token: token.to_string(),
            });
        }

        // u64::from_str accepts a leading '+', so check the digits first
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DirectiveError::InvalidDigits {
                token: token.to_string(),
            });
        }

        let overflow = || DirectiveError::Overflow {
            token: token.to_string(),
        };
        let minutes: u64 = digits.parse().map_err(|_| overflow())?;
        let seconds = minutes_to_seconds(minutes).ok_or_else(overflow)?;

        Ok(Self {
            marker,
            minutes,
            seconds,
        })
    }
}

/// Converts whole minutes to seconds, or `None` on overflow.
#[must_use]
pub const fn minutes_to_seconds(minutes: u64) -> Option<u64> {
    minutes.checked_mul(SECONDS_PER_MINUTE)
}
