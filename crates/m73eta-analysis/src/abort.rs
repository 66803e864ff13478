//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Something an analysis polls between lines to learn it should stop.
pub trait AbortCheck {
    /// Returns true once the analysis should stop.
    fn should_abort(&self) -> bool;
}

impl<F> AbortCheck for F
where
    F: Fn() -> bool,
{
    fn should_abort(&self) -> bool {
        self()
    }
}

/// A shareable abort flag.
///
/// Clones share the flag; once tripped it stays tripped.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    aborted: Arc<AtomicBool>,
}

impl AbortSignal {
    /// Creates a flag that has not been tripped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
    }

    /// Returns true if cancellation was requested.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }
}

impl AbortCheck for AbortSignal {
    fn should_abort(&self) -> bool {
        self.is_aborted()
    }
}
