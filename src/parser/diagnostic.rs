//! Diagnostics: what went wrong, where, and how it is shown to the user.
//!
//! A rendered diagnostic looks like this:
//!
//! ```text
//! error: expected expression (number, identifier, or '(')
//!  --> main.modal:3:12
//!   |
//!  3| assert (1 + }
//!   |             ^
//! Try using: ...
//! ```
//!
//! The `Try using:` line only appears when the diagnostic carries a hint.

use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::{SourceLocation, Token};
use std::fmt;
use tracing::debug;

/// One reported error, with everything needed to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub file: String,
    pub line: usize,
    pub col: usize,
    /// Full text of the offending line, without its terminator
    pub source_line: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Build a diagnostic pointing at `token` inside `source`.
    pub fn new(file: &str, source: &str, token: &Token<'_>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: file.to_string(),
            line: token.line,
            col: token.col,
            source_line: source_line(source, token.offset).to_string(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.col)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;
        writeln!(f, " --> {}:{}:{}", self.file, self.line, self.col)?;
        writeln!(f, "  |")?;
        writeln!(f, "{:>2}| {}", self.line, self.source_line)?;
        writeln!(f, "  | {}^", " ".repeat(self.col.saturating_sub(1)))?;
        if let Some(hint) = &self.hint {
            writeln!(f, "Try using: {hint}")?;
        }
        Ok(())
    }
}

/// The line of `source` containing byte `offset`, without `\n` or `\r\n`.
///
/// An offset at the very end of the input selects the last line.
pub fn source_line(source: &str, offset: usize) -> &str {
    let offset = offset.min(source.len());
    let start = source[..offset].rfind('\n').map_or(0, |newline| newline + 1);
    let end = source[offset..]
        .find('\n')
        .map_or(source.len(), |newline| offset + newline);
    let line = &source[start..end];
    line.strip_suffix('\r').unwrap_or(line)
}

// ===== Reporting =====

impl<'src> Parser<'src> {
    /// Report an error at `token`.
    ///
    /// Sets the sticky error flag, records the diagnostic (printing it to
    /// stderr unless disabled) and returns the error to propagate.
    pub fn report(&mut self, token: Token<'src>, message: impl Into<String>) -> ParseError {
        let diagnostic = Diagnostic::new(&self.file_name, self.source(), &token, message);
        self.record(diagnostic)
    }

    /// Like [`Parser::report`], with a suggested fix shown after the snippet.
    pub fn report_with_hint(
        &mut self,
        token: Token<'src>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> ParseError {
        let diagnostic =
            Diagnostic::new(&self.file_name, self.source(), &token, message).with_hint(hint);
        self.record(diagnostic)
    }

    pub(crate) fn error_at_current(&mut self, message: impl Into<String>) -> ParseError {
        let token = self.current;
        self.report(token, message)
    }

    fn record(&mut self, diagnostic: Diagnostic) -> ParseError {
        self.had_error = true;
        debug!(
            file = %diagnostic.file,
            line = diagnostic.line,
            col = diagnostic.col,
            "{}",
            diagnostic.message
        );
        if self.config.emit_diagnostics {
            eprint!("{diagnostic}");
        }

        let error = ParseError::new(diagnostic.message.clone(), diagnostic.location());
        self.diagnostics.push(diagnostic);
        error
    }
}
