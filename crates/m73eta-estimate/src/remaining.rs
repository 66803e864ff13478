//! Shared remaining-time cell.
//!
//! The cell holds at most one value, "last write wins". Access follows a
//! single-writer / multi-reader discipline: [`RemainingTimeWriter`] is not
//! `Clone`, [`RemainingTimeReader`] is. Both sides only ever perform one
//! atomic load or store, so no lock is needed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Sentinel for "no directive observed yet".
///
/// Never produced by a directive: `minutes * 60` is even, `u64::MAX` is odd.
const UNSET: u64 = u64::MAX;

/// Creates a new, unset remaining-time cell and returns its two handles.
#[must_use]
pub fn remaining_time() -> (RemainingTimeWriter, RemainingTimeReader) {
    let cell = Arc::new(AtomicU64::new(UNSET));
    (
        RemainingTimeWriter {
            cell: Arc::clone(&cell),
        },
        RemainingTimeReader { cell },
    )
}

/// The sole writer of a remaining-time cell.
#[derive(Debug)]
pub struct RemainingTimeWriter {
    cell: Arc<AtomicU64>,
}

impl RemainingTimeWriter {
    /// Stores a new remaining time in seconds.
    pub fn set(&self, seconds: u64) {
        self.cell.store(seconds.min(UNSET - 1), Ordering::Release);
    }

    /// Forgets the stored value so readers fall back again.
    pub fn clear(&self) {
        self.cell.store(UNSET, Ordering::Release);
    }

    /// Returns a new reader for this cell.
    #[must_use]
    pub fn reader(&self) -> RemainingTimeReader {
        RemainingTimeReader {
            cell: Arc::clone(&self.cell),
        }
    }

    /// Returns the current value, as a reader would see it.
    #[must_use]
    pub fn get(&self) -> Option<u64> {
        load(&self.cell)
    }
}

/// A read-only view of a remaining-time cell.
#[derive(Debug, Clone)]
pub struct RemainingTimeReader {
    cell: Arc<AtomicU64>,
}

impl RemainingTimeReader {
    /// Returns the remaining time in seconds, if a directive has been seen.
    #[must_use]
    pub fn seconds(&self) -> Option<u64> {
        load(&self.cell)
    }

    /// Returns the remaining time as a [`Duration`].
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.seconds().map(Duration::from_secs)
    }

    /// Returns true if a value is currently stored.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.seconds().is_some()
    }
}

fn load(cell: &AtomicU64) -> Option<u64> {
    match cell.load(Ordering::Acquire) {
        UNSET => None,
        seconds => Some(seconds),
    }
}
