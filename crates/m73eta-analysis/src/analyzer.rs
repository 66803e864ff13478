//! `M73` scan of uploaded files.

use crate::{AbortCheck, BaseAnalyzer};
use m73eta_gcode::{Marker, parse_line};
use m73eta_types::{AnalysisError, AnalysisOutcome, AnalysisResult, PrintMode};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-line pause of a low-priority scan.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(10);

/// When a scan in silent mode may stop.
///
/// In normal mode every policy stops at the first `R` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanPolicy {
    /// Keep reading until both an `R` and an `S` value were found.
    #[default]
    AwaitBoth,
    /// Stop at the first honoured value of either kind.
    FirstMatch,
}

impl ScanPolicy {
    /// Returns the policy as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitBoth => "await-both",
            Self::FirstMatch => "first-match",
        }
    }
}

impl std::fmt::Display for ScanPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Seeds an initial print-time estimate from a file's `M73` directives.
///
/// Runs the [`BaseAnalyzer`] first, then reads the file line by line and
/// overwrites the baseline estimate with the first honoured `R` value, or
/// in silent mode the first `S` value, which takes precedence.
#[derive(Debug, Clone)]
pub struct FilePreAnalyzer<B> {
    base: B,
    policy: ScanPolicy,
    throttle: Duration,
}

impl<B: BaseAnalyzer> FilePreAnalyzer<B> {
    /// Creates an analyzer with the default policy and throttle.
    #[must_use]
    pub const fn new(base: B) -> Self {
        Self {
            base,
            policy: ScanPolicy::AwaitBoth,
            throttle: DEFAULT_THROTTLE,
        }
    }

    /// Sets the silent-mode stop policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the per-line pause used when not running at high priority.
    #[must_use]
    pub const fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Returns the silent-mode stop policy.
    #[must_use]
    pub const fn policy(&self) -> ScanPolicy {
        self.policy
    }

    /// Analyses one uploaded file.
    ///
    /// `abort` is polled after the base step and after every line that
    /// did not end the scan; a positive answer returns the result so far
    /// as [`AnalysisOutcome::Partial`]. Low-priority scans sleep for the
    /// throttle interval before each poll.
    ///
    /// # Arguments
    ///
    /// * `path` - Absolute path of the uploaded file
    /// * `high_priority` - Skip the per-line throttle
    /// * `mode` - Whether silent (`S`) values are honoured
    /// * `abort` - Cancellation check
    pub fn analyze<A: AbortCheck>(
        &self,
        path: &Path,
        high_priority: bool,
        mode: PrintMode,
        abort: &A,
    ) -> AnalysisOutcome {
        self.scan(path, high_priority, mode, abort)
            .unwrap_or_else(AnalysisOutcome::Failed)
    }

    fn scan<A: AbortCheck>(
        &self,
        path: &Path,
        high_priority: bool,
        mode: PrintMode,
        abort: &A,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let baseline = self.base.analyze(path, high_priority, abort)?;
        if abort.should_abort() {
            debug!(path = %path.display(), "Analysis aborted after base step");
            return Ok(AnalysisOutcome::Partial(baseline));
        }

        let file = File::open(path).map_err(|e| AnalysisError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut reader = BufReader::new(file);
        let mut scan = ScanState::new(baseline, mode, self.policy);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| AnalysisError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            if read == 0 {
                break;
            }

            scan.feed(&String::from_utf8_lossy(&buf));
            if scan.is_done() {
                break;
            }

            if !high_priority {
                std::thread::sleep(self.throttle);
            }
            if abort.should_abort() {
                debug!(path = %path.display(), "Analysis aborted, returning partial result");
                return Ok(AnalysisOutcome::Partial(scan.result));
            }
        }

        Ok(AnalysisOutcome::Completed(scan.finish(path)))
    }
}

/// Bookkeeping of one file scan.
#[derive(Debug)]
struct ScanState {
    result: AnalysisResult,
    mode: PrintMode,
    policy: ScanPolicy,
    found_normal: bool,
    found_silent: bool,
}

impl ScanState {
    const fn new(baseline: AnalysisResult, mode: PrintMode, policy: ScanPolicy) -> Self {
        Self {
            result: baseline,
            mode,
            policy,
            found_normal: false,
            found_silent: false,
        }
    }

    fn feed(&mut self, line: &str) {
        let Some(directive) = parse_line(line) else {
            return;
        };

        for token in directive.remaining_times() {
            let token = match token {
                Ok(token) => token,
                Err(e) => {
                    warn!(line = line.trim_end(), "Skipping M73 token: {e}");
                    continue;
                }
            };

            match token.marker {
                Marker::Normal if !self.found_normal => {
                    self.found_normal = true;
                    // A silent value, once found, keeps precedence
                    if !self.found_silent {
                        self.record(token.seconds, false);
                    }
                }
                Marker::Silent if self.mode.is_silent() && !self.found_silent => {
                    self.found_silent = true;
                    self.record(token.seconds, true);
                }
                _ => {}
            }
        }
    }

    fn record(&mut self, seconds: u64, silent: bool) {
        self.result.estimated_print_time = Some(seconds);
        self.result.silent_mode_detected = silent;
        info!(seconds, silent, "New ETA from the upload");
    }

    const fn is_done(&self) -> bool {
        match (self.mode, self.policy) {
            (PrintMode::Normal, _) => self.found_normal,
            (PrintMode::Silent, ScanPolicy::FirstMatch) => self.found_normal || self.found_silent,
            (PrintMode::Silent, ScanPolicy::AwaitBoth) => self.found_normal && self.found_silent,
        }
    }

    fn finish(self, path: &Path) -> AnalysisResult {
        if self.mode.is_silent() && self.found_normal && !self.found_silent {
            warn!(
                path = %path.display(),
                "Silent mode is enabled but the file only reports normal-mode remaining time, \
                 check the slicer's M73 settings"
            );
        }
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AbortSignal, NoBaseAnalysis};
    use std::cell::Cell;
    use std::io::Write;
    use std::time::Instant;
    use tempfile::NamedTempFile;

    fn gcode_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn analyzer() -> FilePreAnalyzer<NoBaseAnalysis> {
        FilePreAnalyzer::new(NoBaseAnalysis)
    }

    fn never() -> bool {
        false
    }

    /// Base step that reports a fixed estimate.
    struct FixedBase(u64);

    impl BaseAnalyzer for FixedBase {
        fn analyze(
            &self,
            _path: &Path,
            _high_priority: bool,
            _abort: &dyn AbortCheck,
        ) -> Result<AnalysisResult, AnalysisError> {
            Ok(AnalysisResult::with_estimate(self.0, false))
        }
    }

    /// Base step that always fails.
    struct FailingBase;

    impl BaseAnalyzer for FailingBase {
        fn analyze(
            &self,
            path: &Path,
            _high_priority: bool,
            _abort: &dyn AbortCheck,
        ) -> Result<AnalysisResult, AnalysisError> {
            Err(AnalysisError::Base {
                path: path.to_path_buf(),
                reason: "unsupported".to_string(),
            })
        }
    }

    #[test]
    fn test_normal_directive() {
        let file = gcode_file(&["G28", "M73 P0 R100", "G1 X10"]);
        let outcome = analyzer().analyze(file.path(), true, PrintMode::Normal, &never);

        let AnalysisOutcome::Completed(result) = outcome else {
            panic!("expected completed outcome, got {outcome:?}");
        };
        assert_eq!(result.estimated_print_time, Some(6000));
        assert!(!result.silent_mode_detected);
    }

    #[test]
    fn test_first_normal_directive_wins() {
        let file = gcode_file(&["M73 P0 R100", "M73 P1 R99", "M73 P2 R98"]);
        let result = analyzer()
            .analyze(file.path(), true, PrintMode::Normal, &never)
            .into_result()
            .unwrap();

        assert_eq!(result.estimated_print_time, Some(6000));
    }

    #[test]
    fn test_silent_value_wins_in_silent_mode() {
        let file = gcode_file(&["M73 P0 R100", "M73 Q0 S80"]);
        let outcome = analyzer().analyze(file.path(), true, PrintMode::Silent, &never);

        assert!(matches!(outcome, AnalysisOutcome::Completed(_)));
        let result = outcome.into_result().unwrap();
        assert_eq!(result.estimated_print_time, Some(4800));
        assert!(result.silent_mode_detected);
    }

    #[test]
    fn test_silent_value_keeps_precedence_over_later_normal() {
        let file = gcode_file(&["M73 Q0 S80", "M73 P0 R100"]);
        let result = analyzer()
            .analyze(file.path(), true, PrintMode::Silent, &never)
            .into_result()
            .unwrap();

        assert_eq!(result.estimated_print_time, Some(4800));
        assert!(result.silent_mode_detected);
    }

    #[test]
    fn test_silent_values_ignored_in_normal_mode() {
        let file = gcode_file(&["M73 Q0 S80", "G28", "M73 P0 R100"]);
        let result = analyzer()
            .analyze(file.path(), true, PrintMode::Normal, &never)
            .into_result()
            .unwrap();

        assert_eq!(result.estimated_print_time, Some(6000));
        assert!(!result.silent_mode_detected);
    }

    #[test]
    fn test_normal_only_file_in_silent_mode() {
        let file = gcode_file(&["M73 P0 R100", "G28", "G1 X1"]);
        let outcome = analyzer().analyze(file.path(), true, PrintMode::Silent, &never);

        let AnalysisOutcome::Completed(result) = outcome else {
            panic!("expected completed outcome, got {outcome:?}");
        };
        assert_eq!(result.estimated_print_time, Some(6000));
        assert!(!result.silent_mode_detected);
    }

    #[test]
    fn test_combined_directive_line() {
        let file = gcode_file(&["M73 P0 R100 Q0 S80"]);
        let result = analyzer()
            .analyze(file.path(), true, PrintMode::Silent, &never)
            .into_result()
            .unwrap();

        assert_eq!(result.estimated_print_time, Some(4800));
    }

    #[test]
    fn test_scan_stops_at_match_in_normal_mode() {
        let file = gcode_file(&["M73 P0 R100", "G1", "G1", "G1"]);
        let polls = Cell::new(0);
        let counting = || {
            polls.set(polls.get() + 1);
            false
        };

        analyzer().analyze(file.path(), true, PrintMode::Normal, &counting);

        // One poll after the base step, none once the match ended the scan
        assert_eq!(polls.get(), 1);
    }

    #[test]
    fn test_first_match_policy_in_silent_mode() {
        let file = gcode_file(&["M73 P0 R100", "M73 Q0 S80"]);
        let result = analyzer()
            .with_policy(ScanPolicy::FirstMatch)
            .analyze(file.path(), true, PrintMode::Silent, &never)
            .into_result()
            .unwrap();

        assert_eq!(result.estimated_print_time, Some(6000));
        assert!(!result.silent_mode_detected);
    }

    #[test]
    fn test_no_directive_keeps_baseline() {
        let file = gcode_file(&["G28", "G1 X10", "M104 S200"]);
        let outcome = FilePreAnalyzer::new(FixedBase(1234)).analyze(
            file.path(),
            true,
            PrintMode::Normal,
            &never,
        );

        let AnalysisOutcome::Completed(result) = outcome else {
            panic!("expected completed outcome, got {outcome:?}");
        };
        assert_eq!(result.estimated_print_time, Some(1234));
    }

    #[test]
    fn test_directive_overrides_baseline() {
        let file = gcode_file(&["M73 P0 R2"]);
        let result = FilePreAnalyzer::new(FixedBase(1234))
            .analyze(file.path(), true, PrintMode::Normal, &never)
            .into_result()
            .unwrap();

        assert_eq!(result.estimated_print_time, Some(120));
    }

    #[test]
    fn test_malformed_directive_skipped() {
        let file = gcode_file(&["M73 P0 R", "M73 P0 Rx", "M73 P0 R7"]);
        let result = analyzer()
            .analyze(file.path(), true, PrintMode::Normal, &never)
            .into_result()
            .unwrap();

        assert_eq!(result.estimated_print_time, Some(420));
    }

    #[test]
    fn test_abort_after_first_line_returns_partial() {
        let file = gcode_file(&["G28", "M73 P0 R100", "G1 X10"]);
        let polls = Cell::new(0);
        // False after the base step, true after the first line
        let abort_on_second_poll = || {
            polls.set(polls.get() + 1);
            polls.get() >= 2
        };

        let outcome = FilePreAnalyzer::new(FixedBase(99)).analyze(
            file.path(),
            true,
            PrintMode::Normal,
            &abort_on_second_poll,
        );

        let AnalysisOutcome::Partial(result) = outcome else {
            panic!("expected partial outcome, got {outcome:?}");
        };
        assert_eq!(result.estimated_print_time, Some(99));
    }

    #[test]
    fn test_abort_keeps_accumulated_value() {
        let file = gcode_file(&["M73 P0 R100", "G28", "G1 X10", "M73 Q0 S80"]);
        let signal = AbortSignal::new();
        let polls = Cell::new(0);
        let abort_on_third_poll = || {
            polls.set(polls.get() + 1);
            if polls.get() >= 3 {
                signal.abort();
            }
            signal.is_aborted()
        };

        let outcome =
            analyzer().analyze(file.path(), true, PrintMode::Silent, &abort_on_third_poll);

        assert!(outcome.is_partial());
        assert_eq!(outcome.into_result().unwrap().estimated_print_time, Some(6000));
    }

    #[test]
    fn test_abort_before_scan() {
        let file = gcode_file(&["M73 P0 R100"]);
        let signal = AbortSignal::new();
        signal.abort();

        let outcome = analyzer().analyze(file.path(), true, PrintMode::Normal, &signal);

        assert!(outcome.is_partial());
        assert_eq!(outcome.into_result().unwrap(), AnalysisResult::default());
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.gcode");

        let outcome = analyzer().analyze(&path, true, PrintMode::Normal, &never);

        let AnalysisOutcome::Failed(AnalysisError::Open { path: failed, .. }) = outcome else {
            panic!("expected open failure, got {outcome:?}");
        };
        assert_eq!(failed, path);
    }

    #[test]
    fn test_unreadable_file_fails() {
        let dir = tempfile::tempdir().unwrap();

        // A directory opens fine but cannot be read
        let outcome = analyzer().analyze(dir.path(), true, PrintMode::Normal, &never);

        let AnalysisOutcome::Failed(AnalysisError::Read { path, .. }) = outcome else {
            panic!("expected read failure, got {outcome:?}");
        };
        assert_eq!(path, dir.path());
    }

    #[test]
    fn test_base_failure_fails() {
        let file = gcode_file(&["M73 P0 R100"]);
        let outcome =
            FilePreAnalyzer::new(FailingBase).analyze(file.path(), true, PrintMode::Normal, &never);

        assert!(matches!(
            outcome,
            AnalysisOutcome::Failed(AnalysisError::Base { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"; thumbnail \xff\xfe\n").unwrap();
        file.write_all(b"M73 P0 R5\n").unwrap();
        file.flush().unwrap();

        let result = analyzer()
            .analyze(file.path(), true, PrintMode::Normal, &never)
            .into_result()
            .unwrap();

        assert_eq!(result.estimated_print_time, Some(300));
    }

    #[test]
    fn test_low_priority_is_throttled() {
        let file = gcode_file(&["G28", "G1", "G1", "G1", "G1"]);

        let start = Instant::now();
        analyzer()
            .with_throttle(Duration::from_millis(20))
            .analyze(file.path(), false, PrintMode::Normal, &never);

        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_high_priority_is_not_throttled() {
        let file = gcode_file(&["G28", "G1", "G1", "G1", "G1"]);

        let start = Instant::now();
        analyzer()
            .with_throttle(Duration::from_secs(10))
            .analyze(file.path(), true, PrintMode::Normal, &never);

        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
