//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and the core parsing
//! infrastructure: the error type, token navigation helpers, error recovery
//! and the program entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent parser with the following organization:
//! - This module: Parser struct, helper methods, recovery and coordination
//! - `statements`: `assert`, `test`, blocks and expression statements
//! - `expressions`: arithmetic expressions with precedence climbing
//! - `diagnostic`: rendering and recording of reported errors
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Tokens are pulled from the [`Scanner`] one at a time; the parser only ever
//! holds the current (look-ahead) token and the previously consumed one.

use crate::config::ParserConfig;
use crate::parser::ast::AstNode;
use crate::parser::diagnostic::Diagnostic;
use crate::parser::scanner::Scanner;
use crate::parser::token::{SourceLocation, Token, TokenKind};
use tracing::{debug, info, trace};

/// Parser error type
///
/// A `ParseError` is only created by the reporter, so holding one means the
/// diagnostic has already been emitted and the error flag is set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at {location}: {message}")]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Everything a parse produces.
///
/// `root` is always a block node, even when `had_error` is set; it then holds
/// the statements that were recovered. Check the flag, not the tree, to decide
/// whether later stages may run.
#[derive(Debug)]
pub struct ParseOutcome<'src> {
    pub root: AstNode<'src>,
    pub had_error: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'src> ParseOutcome<'src> {
    /// Top-level statements of the program.
    pub fn statements(&self) -> &[AstNode<'src>] {
        self.root.statements().unwrap_or_default()
    }
}

/// Recursive descent parser for Modal
pub struct Parser<'src> {
    pub(crate) scanner: Scanner<'src>,
    pub(crate) current: Token<'src>,
    pub(crate) previous: Token<'src>,
    pub(crate) file_name: String,
    pub(crate) had_error: bool,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) config: ParserConfig,
    pub(crate) depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(file_name: impl Into<String>, source: &'src str) -> Self {
        Self::with_config(file_name, source, ParserConfig::default())
    }

    pub fn with_config(file_name: impl Into<String>, source: &'src str, config: ParserConfig) -> Self {
        let mut parser = Self {
            scanner: Scanner::new(source),
            current: Token::default(),
            previous: Token::default(),
            file_name: file_name.into(),
            had_error: false,
            diagnostics: Vec::new(),
            config,
            depth: 0,
        };
        parser.current = parser.next_significant_token();
        parser
    }

    /// Parse the whole source and hand back the tree with its diagnostics.
    pub fn parse(mut self) -> ParseOutcome<'src> {
        let root = self.parse_program();
        info!(
            file = %self.file_name,
            statements = root.statements().map_or(0, <[_]>::len),
            errors = self.diagnostics.len(),
            "parse finished"
        );
        ParseOutcome {
            root,
            had_error: self.had_error,
            diagnostics: self.diagnostics,
        }
    }

    /// Parse the entire program: statements until end of file.
    ///
    /// Failed statements are dropped after recovery; the returned block holds
    /// every statement that parsed.
    pub fn parse_program(&mut self) -> AstNode<'src> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let start = self.current.offset;
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    debug!(%err, "top-level statement failed");
                    self.recover(start);

                    // No block is open here, so a `}` the error already
                    // pointed at closes nothing and is not reported again.
                    if self.check(TokenKind::RBrace) && self.current.location() == err.location {
                        self.advance();
                    }
                }
            }
        }

        AstNode::block(self.current, statements)
    }

    // ===== Accessors =====

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &'src str {
        self.scanner.source()
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// The next unconsumed token
    pub fn current(&self) -> Token<'src> {
        self.current
    }

    /// The last consumed token
    pub fn previous(&self) -> Token<'src> {
        self.previous
    }

    // ===== Helper methods =====

    /// Shift current into previous and pull the next token.
    pub fn advance(&mut self) {
        self.previous = self.current;
        self.current = self.next_significant_token();
    }

    /// Preprocessor lines carry no grammar and are skipped here.
    fn next_significant_token(&mut self) -> Token<'src> {
        loop {
            let token = self.scanner.next_token();
            if token.kind != TokenKind::Preprocessor {
                return token;
            }
            trace!(line = token.line, "skipping preprocessor line {:?}", token.text);
        }
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Advance if the current token is of `kind`.
    pub fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance past a token of `kind`, or report `message` at the current token.
    pub fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            let token = self.current;
            self.advance();
            Ok(token)
        } else {
            let found = self.current;
            Err(self.error_at_current(format!("{message}, found {found}")))
        }
    }

    /// Run `parse` one nesting level deeper, refusing to exceed the limit.
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let limit = self.config.max_nesting_depth;
        if self.depth >= limit {
            return Err(self.error_at_current(format!("nesting too deep (limit {limit})")));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ===== Error recovery =====

    /// Recover after a statement that started at byte `statement_start` failed.
    ///
    /// A statement that failed without consuming anything has its first token
    /// skipped so the caller's loop always moves forward.
    pub(crate) fn recover(&mut self, statement_start: usize) {
        if self.current.offset == statement_start && !self.is_at_end() {
            self.advance();
        }
        self.synchronize();
        debug!(
            line = self.current.line,
            col = self.current.col,
            "resynchronized at {}",
            self.current
        );
    }

    /// Discard tokens until a statement boundary.
    ///
    /// Stops after a `;`, before a token that starts or closes a statement
    /// (`test`, `assert`, `{`, `}`), or at end of file.
    pub(crate) fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous.is_operator(";") {
                return;
            }

            match self.current.kind {
                TokenKind::Test | TokenKind::Assert | TokenKind::LBrace | TokenKind::RBrace => {
                    return;
                }
                _ => self.advance(),
            }
        }
    }
}
