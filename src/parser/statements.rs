//! Statement parsing implementation
//!
//! This module handles parsing of Modal statements:
//! - `assert` statements: `assert expr`
//! - test declarations: `test "name" { ... }`
//! - blocks: `{ ... }`
//! - expression statements
//!
//! Blocks recover from a failed statement locally, so one bad line inside a
//! test body does not discard the rest of the body.

use crate::parser::ast::{unquote, AstNode};
use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::TokenKind;
use tracing::debug;

impl<'src> Parser<'src> {
    /// Parse a single statement
    pub fn parse_statement(&mut self) -> Result<AstNode<'src>, ParseError> {
        match self.current.kind {
            TokenKind::Assert => {
                let keyword = self.current;
                self.advance();
                let expr = self.parse_expression()?;
                Ok(AstNode::assert(keyword, expr))
            }
            TokenKind::Test => {
                self.advance();
                self.parse_test()
            }
            TokenKind::LBrace => self.parse_block(),
            _ => self.parse_expression(),
        }
    }

    /// Parse a brace-delimited block.
    ///
    /// A missing `}` is reported but the statements read so far are still
    /// returned as a block.
    pub fn parse_block(&mut self) -> Result<AstNode<'src>, ParseError> {
        let open = self.consume(TokenKind::LBrace, "expected '{' to start block")?;

        self.nested(|parser| {
            let mut statements = Vec::new();

            while !parser.check(TokenKind::RBrace) && !parser.is_at_end() {
                let start = parser.current.offset;
                match parser.parse_statement() {
                    Ok(statement) => statements.push(statement),
                    Err(err) => {
                        debug!(%err, "statement in block failed");
                        parser.recover(start);
                    }
                }
            }

            if let Err(err) = parser.consume(TokenKind::RBrace, "expected '}' at end of block") {
                debug!(%err, opened = %open.location(), "unterminated block");
            }

            Ok(AstNode::block(open, statements))
        })
    }

    /// Parse the rest of a test declaration; `test` is already consumed.
    fn parse_test(&mut self) -> Result<AstNode<'src>, ParseError> {
        let name = self.current;

        match name.kind {
            TokenKind::String if unquote(name).is_empty() => {
                return Err(self.report(name, "test name cannot be empty"));
            }
            TokenKind::String => {}
            TokenKind::Identifier if !self.config.require_quoted_test_names => {}
            TokenKind::Identifier => {
                return Err(self.report_with_hint(
                    name,
                    "test name must be quoted",
                    format!("test \"{}\" {{ ... }}", name.text),
                ));
            }
            _ => {
                return Err(self.report_with_hint(
                    name,
                    "expected string literal after 'test'",
                    "test \"name\" { ... }",
                ));
            }
        }
        self.advance();

        if !self.check(TokenKind::LBrace) {
            return Err(self.error_at_current("expected '{' after test name"));
        }
        let body = self.parse_block()?;

        debug!(name = unquote(name), line = name.line, "parsed test");
        Ok(AstNode::test(name, body))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ParserConfig;
    use crate::parser::ast::AstNode;
    use crate::parser::parse::{ParseOutcome, Parser};

    fn parse_with(source: &str, config: ParserConfig) -> ParseOutcome<'_> {
        Parser::with_config("stmt.modal", source, config.with_emit_diagnostics(false)).parse()
    }

    fn parse(source: &str) -> ParseOutcome<'_> {
        parse_with(source, ParserConfig::default())
    }

    fn messages(outcome: &ParseOutcome<'_>) -> Vec<String> {
        outcome.diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_parse_assert() {
        let outcome = parse("assert x * 2");

        assert!(!outcome.had_error);
        assert_eq!(outcome.root.to_string(), "(block (assert (* x 2)))");
        match &outcome.statements()[0] {
            AstNode::Assert { token, .. } => assert_eq!(token.text, "assert"),
            _ => panic!("Expected assert statement"),
        }
    }

    #[test]
    fn test_parse_test_declaration() {
        let outcome = parse("test \"adds\" {\n  assert 1 + 1\n  assert 2\n}");

        assert!(!outcome.had_error);
        match &outcome.statements()[0] {
            AstNode::Test { name, body, token } => {
                assert_eq!(*name, "adds");
                assert_eq!(token.text, "\"adds\"");
                assert_eq!(body.statements().map(<[_]>::len), Some(2));
            }
            _ => panic!("Expected test declaration"),
        }
    }

    #[test]
    fn test_bare_test_name_is_accepted_by_default() {
        let outcome = parse("test works { assert 1 }");

        assert!(!outcome.had_error);
        assert_eq!(outcome.root.to_string(), "(block (test \"works\" (block (assert 1))))");
    }

    #[test]
    fn test_bare_test_name_rejected_when_strict() {
        let outcome = parse_with(
            "test works { assert 1 }",
            ParserConfig::default().with_quoted_test_names(true),
        );

        assert!(outcome.had_error);
        assert_eq!(messages(&outcome)[0], "test name must be quoted");
        assert_eq!(
            outcome.diagnostics[0].hint.as_deref(),
            Some("test \"works\" { ... }")
        );
    }

    #[test]
    fn test_test_name_errors() {
        let outcome = parse("test \"\" { }");
        assert_eq!(messages(&outcome)[0], "test name cannot be empty");

        let outcome = parse("test 42 { }");
        assert_eq!(messages(&outcome)[0], "expected string literal after 'test'");
        assert!(outcome.diagnostics[0].hint.is_some());

        let outcome = parse("test \"t\" assert 1");
        assert_eq!(messages(&outcome)[0], "expected '{' after test name");
        // the assert after the bad header still parses
        assert_eq!(outcome.statements().len(), 1);
    }

    #[test]
    fn test_nested_blocks() {
        let outcome = parse("{ { assert a } { } }");

        assert!(!outcome.had_error);
        assert_eq!(
            outcome.root.to_string(),
            "(block (block (block (assert a)) (block)))"
        );
    }

    #[test]
    fn test_unterminated_block_is_kept() {
        let outcome = parse("test \"open\" { assert 1");

        assert!(outcome.had_error);
        assert_eq!(
            messages(&outcome),
            vec!["expected '}' at end of block, found end of file"]
        );
        assert_eq!(
            outcome.root.to_string(),
            "(block (test \"open\" (block (assert 1))))"
        );
    }

    #[test]
    fn test_missing_operand_resyncs_at_brace() {
        let outcome = parse("{ assert ( }");

        assert_eq!(
            messages(&outcome),
            vec!["expected expression (number, identifier, or '(')"]
        );
        assert_eq!(outcome.root.to_string(), "(block (block))");
    }

    #[test]
    fn test_block_recovers_per_statement() {
        let outcome = parse("test \"t\" {\n  assert (1 + )\n  assert 2\n}");

        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(
            outcome.root.to_string(),
            "(block (test \"t\" (block (assert 2))))"
        );
    }

    #[test]
    fn test_block_depth_limit() {
        let outcome = parse_with("{ { { } } }", ParserConfig::default().with_max_nesting_depth(2));

        assert!(outcome.had_error);
        assert_eq!(messages(&outcome)[0], "nesting too deep (limit 2)");
    }
}
