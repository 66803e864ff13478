//! Benchmark fixtures for m73eta.

use std::fmt::Write as _;
use std::io::{self, Write};
use tempfile::NamedTempFile;

/// Shape of a generated G-code file.
#[derive(Debug, Clone, Copy)]
pub struct GcodeFixture {
    /// Number of lines in the file.
    pub lines: usize,
    /// Emit an `M73 P.. R..` line every this many lines, 0 for never.
    pub normal_every: usize,
    /// Emit an `M73 Q.. S..` line every this many lines, 0 for never.
    pub silent_every: usize,
}

impl GcodeFixture {
    /// A file whose only remaining times sit on its last two lines.
    ///
    /// This is the worst case for a scan, which must read everything.
    #[must_use]
    pub const fn trailing_directives(lines: usize) -> Self {
        Self {
            lines,
            normal_every: 0,
            silent_every: 0,
        }
    }

    /// A file reporting both remaining times once a minute of printing,
    /// roughly every `every` lines.
    #[must_use]
    pub const fn periodic(lines: usize, every: usize) -> Self {
        Self {
            lines,
            normal_every: every,
            silent_every: every,
        }
    }

    /// Renders the file contents.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.lines * 24);
        let total_minutes = self.lines / 100 + 1;

        for i in 0..self.lines {
            let percent = i * 100 / self.lines.max(1);
            let left = total_minutes - (total_minutes * i / self.lines.max(1));

            if self.normal_every > 0 && i % self.normal_every == 0 {
                let _ = writeln!(out, "M73 P{percent} R{left}");
            } else if self.silent_every > 0 && i % self.silent_every == 1 {
                let _ = writeln!(out, "M73 Q{percent} S{}", left + left / 10);
            } else {
                let _ = writeln!(
                    out,
                    "G1 X{}.{} Y{}.{} E0.0{} ; perimeter",
                    i % 220,
                    i % 10,
                    i % 200,
                    i % 7,
                    i % 9
                );
            }
        }

        if self.normal_every == 0 && self.silent_every == 0 {
            let _ = writeln!(out, "M73 P100 R0");
            let _ = writeln!(out, "M73 Q100 S0");
        }

        out
    }

    /// Writes the file to a temporary location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self) -> io::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(self.render().as_bytes())?;
        file.flush()?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_directives() {
        let text = GcodeFixture::trailing_directives(10).render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 12);
        assert!(lines[..10].iter().all(|l| l.starts_with("G1")));
        assert_eq!(lines[10], "M73 P100 R0");
    }

    #[test]
    fn test_periodic() {
        let text = GcodeFixture::periodic(100, 10).render();

        assert_eq!(text.lines().filter(|l| l.starts_with("M73 P")).count(), 10);
        assert_eq!(text.lines().filter(|l| l.starts_with("M73 Q")).count(), 10);
    }
}
