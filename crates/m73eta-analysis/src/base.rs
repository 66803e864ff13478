//! The host's base analysis step.

use crate::AbortCheck;
use m73eta_types::{AnalysisError, AnalysisResult};
use std::path::Path;

/// Analysis the host performs before the `M73` scan augments it.
///
/// [`FilePreAnalyzer`](crate::FilePreAnalyzer) holds one of these and calls
/// it first; its result is the baseline the scan then refines.
pub trait BaseAnalyzer {
    /// Produces the baseline result for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base step cannot analyse the file. Aborting
    /// is not an error: implementations return what they have instead.
    fn analyze(
        &self,
        path: &Path,
        high_priority: bool,
        abort: &dyn AbortCheck,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// A base step that contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBaseAnalysis;

impl BaseAnalyzer for NoBaseAnalysis {
    fn analyze(
        &self,
        _path: &Path,
        _high_priority: bool,
        _abort: &dyn AbortCheck,
    ) -> Result<AnalysisResult, AnalysisError> {
        Ok(AnalysisResult::default())
    }
}
