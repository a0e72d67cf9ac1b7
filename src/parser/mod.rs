//! Modal source code parser
//!
//! This module transforms Modal source text into an Abstract Syntax Tree (AST):
//! - [`token`]: Token kinds, keyword table and source locations
//! - [`scanner`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST) and error recovery
//! - [`ast`]: AST node definitions
//! - [`diagnostic`]: Error records and their rendering
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
pub mod diagnostic;
mod expressions;
pub mod parse;
pub mod scanner;
mod statements;
pub mod token;

pub use ast::{AstNode, BinaryOp, Number};
pub use diagnostic::Diagnostic;
pub use parse::{ParseError, ParseOutcome, Parser};
pub use scanner::Scanner;
pub use token::{SourceLocation, Token, TokenKind};

use crate::config::ParserConfig;

/// Parse `source` with the default configuration.
///
/// `file_name` only appears in diagnostics.
pub fn parse_source<'src>(file_name: &str, source: &'src str) -> ParseOutcome<'src> {
    parse_source_with(file_name, source, ParserConfig::default())
}

pub fn parse_source_with<'src>(
    file_name: &str,
    source: &'src str,
    config: ParserConfig,
) -> ParseOutcome<'src> {
    Parser::with_config(file_name, source, config).parse()
}
