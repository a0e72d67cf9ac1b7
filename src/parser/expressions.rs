//! Expression parsing implementation
//!
//! This module handles Modal's arithmetic expressions using precedence
//! climbing over two binary levels:
//!
//! ```text
//! expression := term   (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := NUMBER | IDENTIFIER | '(' expression ')'
//! ```
//!
//! Both levels are left-associative, so `8 - 3 - 2` is `(8 - 3) - 2`.
//!
//! The entry point is the public [`Parser::parse_expression`]; the levels below it are private.

use crate::parser::ast::{AstNode, BinaryOp, Number};
use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::TokenKind;

impl<'src> Parser<'src> {
    /// Parse expression (top-level entry point)
    pub fn parse_expression(&mut self) -> Result<AstNode<'src>, ParseError> {
        let mut left = self.parse_term()?;

        while let Some(op) = self.binary_operator(&[BinaryOp::Add, BinaryOp::Sub]) {
            let op_token = self.current;
            self.advance();
            let right = self.parse_term()?;
            left = AstNode::binary(op_token, op, left, right);
        }

        Ok(left)
    }

    /// Parse multiplicative: `*` and `/`
    fn parse_term(&mut self) -> Result<AstNode<'src>, ParseError> {
        let mut left = self.parse_factor()?;

        while let Some(op) = self.binary_operator(&[BinaryOp::Mul, BinaryOp::Div]) {
            let op_token = self.current;
            self.advance();
            let right = self.parse_factor()?;
            left = AstNode::binary(op_token, op, left, right);
        }

        Ok(left)
    }

    /// Parse a primary: literal, identifier or parenthesized expression
    fn parse_factor(&mut self) -> Result<AstNode<'src>, ParseError> {
        let token = self.current;

        match token.kind {
            TokenKind::Number => {
                self.advance();
                match Number::parse(token.text) {
                    Some(value) => Ok(AstNode::number(token, value)),
                    None => Err(self.report(token, "number literal out of range")),
                }
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(AstNode::identifier(token))
            }
            TokenKind::LParen => {
                self.advance();
                self.nested(|parser| {
                    let expr = parser.parse_expression()?;
                    parser.consume(TokenKind::RParen, "expected ')' after expression")?;
                    Ok(expr)
                })
            }
            TokenKind::String => Err(self.report(token, "unexpected string literal in expression")),
            TokenKind::Unknown => {
                Err(self.report(token, format!("unexpected character '{}'", token.text)))
            }
            kind if kind.is_reserved() => Err(self.report(
                token,
                format!("'{}' is a reserved word and cannot be used here", token.text),
            )),
            _ => Err(self.report(token, "expected expression (number, identifier, or '(')")),
        }
    }

    /// The operator under the cursor, if it is one of `allowed`.
    fn binary_operator(&self, allowed: &[BinaryOp]) -> Option<BinaryOp> {
        if self.current.kind != TokenKind::Operator {
            return None;
        }
        BinaryOp::from_symbol(self.current.text).filter(|op| allowed.contains(op))
    }
}
