//! # Introduction
//!
//! Modal is a small expression-and-test language. This crate is its front
//! end: it turns source text into an abstract syntax tree, reporting every
//! syntax error it finds along the way instead of stopping at the first one.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Scanner → Tokens → Parser → AST (+ diagnostics)
//! ```
//!
//! 1. [`parser::scanner`]: a character-driven state machine that produces
//!    [`parser::token::Token`]s on demand, each borrowing its text from the
//!    source.
//! 2. [`parser::parse`]: recursive descent with precedence climbing, panic-mode
//!    recovery at statement boundaries.
//! 3. [`parser::ast`]: the owned tree; dropping the root releases everything.
//! 4. [`parser::diagnostic`]: rustc-style error rendering with source snippets.
//! 5. [`config`]: knobs for a single parse.
//!
//! ## Example
//!
//! ```
//! let outcome = modal::parser::parse_source("demo.modal", "assert 1 + 2 * 3");
//! assert!(!outcome.had_error);
//! assert_eq!(outcome.root.to_string(), "(block (assert (+ 1 (* 2 3))))");
//! ```
//!
//! ## Language
//!
//! Statements: `assert expr`, `test "name" { ... }`, `{ ... }` blocks and bare
//! expressions. Expressions: numbers, identifiers, `+ - * /` and parentheses.
//! Comments: `-- to end of line` and `-{ block }-`. Lines starting with `#`
//! are skipped.

pub mod config;
pub mod parser;
