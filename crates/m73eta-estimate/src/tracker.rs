//! Live tracking of `M73` directives sent to the printer.

use crate::{RemainingTimeReader, RemainingTimeWriter};
use m73eta_gcode::{Marker, parse_line};
use m73eta_types::PrintMode;
use tracing::{info, warn};

/// Watches outgoing instructions and records the latest remaining time.
///
/// The tracker owns the only [`RemainingTimeWriter`] of its cell. The host
/// calls [`observe`](Self::observe) from its serial dispatch path, once per
/// sent instruction, in send order.
#[derive(Debug)]
pub struct LiveEstimateTracker {
    writer: RemainingTimeWriter,
}

impl LiveEstimateTracker {
    /// Creates a tracker writing into the given cell.
    #[must_use]
    pub const fn new(writer: RemainingTimeWriter) -> Self {
        Self { writer }
    }

    /// Processes one sent instruction.
    ///
    /// Non-`M73` lines are ignored. For `M73`, every `R` token and, in
    /// silent mode, every `S` token overwrites the remaining time in the
    /// order they appear. Malformed tokens are logged and skipped.
    ///
    /// # Returns
    ///
    /// The number of values written.
    pub fn observe(&self, line: &str, mode: PrintMode) -> usize {
        let Some(directive) = parse_line(line) else {
            return 0;
        };

        let mut written = 0;
        for token in directive.remaining_times() {
            match token {
                Ok(token) if token.marker.is_honoured_in(mode) => {
                    self.writer.set(token.seconds);
                    written += 1;
                    match token.marker {
                        Marker::Normal => info!(seconds = token.seconds, "New ETA"),
                        Marker::Silent => info!(seconds = token.seconds, "New silent ETA"),
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(line = line.trim_end(), "Skipping M73 token: {e}"),
            }
        }

        written
    }

    /// Forgets the current value, e.g. when a new print starts.
    pub fn reset(&self) {
        self.writer.clear();
    }

    /// Returns a reader for the cell this tracker writes.
    #[must_use]
    pub fn reader(&self) -> RemainingTimeReader {
        self.writer.reader()
    }

    /// Returns the current remaining time in seconds.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.writer.get()
    }
}
