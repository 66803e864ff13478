//! `M73` line recognition.

use crate::{DirectiveError, RemainingTimeToken};

/// The "set progress / remaining time" command keyword.
pub const M73_KEYWORD: &str = "M73";

/// Start of an end-of-line G-code comment.
const COMMENT_START: char = ';';

/// An instruction line whose command keyword is `M73`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct M73Line<'a> {
    /// Everything after the keyword, comment removed.
    args: &'a str,
}

impl<'a> M73Line<'a> {
    /// Returns the argument tokens following the keyword.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.args.split_ascii_whitespace()
    }

    /// Returns the remaining-time markers of this line, in order.
    ///
    /// Tokens that are not `R`/`S` markers are skipped. Each malformed
    /// marker yields its own error without affecting the others.
    pub fn remaining_times(
        &self,
    ) -> impl Iterator<Item = Result<RemainingTimeToken, DirectiveError>> + 'a {
        self.tokens().filter_map(RemainingTimeToken::parse)
    }
}

/// Recognises an `M73` instruction.
///
/// The keyword must be the first token and match exactly (case-sensitive):
/// `M730` and `m73` are not directives. Any `;` comment is dropped first.
///
/// # Arguments
///
/// * `line` - One instruction line, with or without trailing newline
///
/// # Returns
///
/// The directive, or `None` if the line is anything else.
#[must_use]
pub fn parse_line(line: &str) -> Option<M73Line<'_>> {
    let code = line.split(COMMENT_START).next().unwrap_or_default().trim();
    let args = code.strip_prefix(M73_KEYWORD)?;

    // "M73" must be a whole token
    if !args.is_empty() && !args.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }

    Some(M73Line { args })
}
