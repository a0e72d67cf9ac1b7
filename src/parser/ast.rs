//! AST (Abstract Syntax Tree) definitions for Modal
//!
//! The tree is strict: every child is owned by exactly one parent through a
//! `Box` or a `Vec`, so there is no sharing and no cycle. Nodes are built
//! bottom-up by the parser and released top-down by `Drop` when the owner of
//! the root lets go of it. A subtree abandoned on an error path is dropped the
//! same way, so partial failures never leak.
//!
//! Operator chains are parsed by a loop and can be arbitrarily deep, so
//! dropping, counting and rendering a tree all walk it with an explicit
//! worklist instead of recursion.

use super::token::{SourceLocation, Token, TokenKind};
use std::fmt;
use std::mem;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Map an operator token's text to the operator it spells.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Sub),
            "*" => Some(BinaryOp::Mul),
            "/" => Some(BinaryOp::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Value of a number literal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Convert the text of a number token. A literal with a dot is a float.
    ///
    /// Returns `None` for an integer that does not fit in `i64`.
    pub fn parse(text: &str) -> Option<Self> {
        if text.contains('.') {
            text.parse::<f64>().ok().map(Number::Float)
        } else {
            text.parse::<i64>().ok().map(Number::Int)
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// AST nodes representing statements and expressions
///
/// Every variant keeps the token that best localizes it, so diagnostics about
/// an already built node can still point into the source.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode<'src> {
    // Expressions
    NumberLiteral {
        value: Number,
        token: Token<'src>,
    },
    Identifier {
        name: &'src str,
        token: Token<'src>,
    },
    BinaryOp {
        op: BinaryOp,
        left: Box<AstNode<'src>>,
        right: Box<AstNode<'src>>,
        token: Token<'src>,
    },

    // Statements
    Block {
        statements: Vec<AstNode<'src>>,
        token: Token<'src>,
    },
    Test {
        /// Test name without the surrounding quotes
        name: &'src str,
        body: Box<AstNode<'src>>,
        token: Token<'src>,
    },
    Assert {
        expr: Box<AstNode<'src>>,
        token: Token<'src>,
    },
}

impl<'src> AstNode<'src> {
    pub fn number(token: Token<'src>, value: Number) -> Self {
        AstNode::NumberLiteral { value, token }
    }

    pub fn identifier(token: Token<'src>) -> Self {
        AstNode::Identifier {
            name: token.text,
            token,
        }
    }

    /// `op_token` is the operator itself; the node takes ownership of both
    /// operands.
    pub fn binary(op_token: Token<'src>, op: BinaryOp, left: Self, right: Self) -> Self {
        AstNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
            token: op_token,
        }
    }

    pub fn block(open: Token<'src>, statements: Vec<Self>) -> Self {
        AstNode::Block {
            statements,
            token: open,
        }
    }

    /// Build a test node; the name is the token text minus its quotes.
    pub fn test(name_token: Token<'src>, body: Self) -> Self {
        AstNode::Test {
            name: unquote(name_token),
            body: Box::new(body),
            token: name_token,
        }
    }

    pub fn assert(keyword: Token<'src>, expr: Self) -> Self {
        AstNode::Assert {
            expr: Box::new(expr),
            token: keyword,
        }
    }

    /// The token this node is localized by
    pub fn token(&self) -> &Token<'src> {
        match self {
            AstNode::NumberLiteral { token, .. }
            | AstNode::Identifier { token, .. }
            | AstNode::BinaryOp { token, .. }
            | AstNode::Block { token, .. }
            | AstNode::Test { token, .. }
            | AstNode::Assert { token, .. } => token,
        }
    }

    pub fn location(&self) -> SourceLocation {
        self.token().location()
    }

    /// Children of a block node, `None` for every other variant.
    pub fn statements(&self) -> Option<&[AstNode<'src>]> {
        match self {
            AstNode::Block { statements, .. } => Some(statements),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];

        while let Some(node) = pending.pop() {
            count += 1;
            match node {
                AstNode::NumberLiteral { .. } | AstNode::Identifier { .. } => {}
                AstNode::BinaryOp { left, right, .. } => {
                    pending.push(left);
                    pending.push(right);
                }
                AstNode::Block { statements, .. } => pending.extend(statements),
                AstNode::Test { body, .. } => pending.push(body),
                AstNode::Assert { expr, .. } => pending.push(expr),
            }
        }

        count
    }

    /// Move every child of this node into `out`, leaving it childless.
    fn detach_children(&mut self, out: &mut Vec<AstNode<'src>>) {
        match self {
            AstNode::NumberLiteral { .. } | AstNode::Identifier { .. } => {}
            AstNode::BinaryOp { left, right, .. } => {
                out.push(mem::take(&mut **left));
                out.push(mem::take(&mut **right));
            }
            AstNode::Block { statements, .. } => out.append(statements),
            AstNode::Test { body, .. } => out.push(mem::take(&mut **body)),
            AstNode::Assert { expr, .. } => out.push(mem::take(&mut **expr)),
        }
    }
}

/// A leaf used to fill a slot whose child has been moved out.
impl Default for AstNode<'_> {
    fn default() -> Self {
        AstNode::NumberLiteral {
            value: Number::Int(0),
            token: Token::default(),
        }
    }
}

/// Releases the subtree one node at a time; each node is emptied of its
/// children before it is freed.
impl Drop for AstNode<'_> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);

        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

/// Strip the quotes from a string token; other tokens are returned as is.
pub(crate) fn unquote(token: Token<'_>) -> &str {
    if token.kind != TokenKind::String {
        return token.text;
    }
    let inner = token.text.strip_prefix('"').unwrap_or(token.text);
    inner.strip_suffix('"').unwrap_or(inner)
}

/// Pieces of output still to be written by `Display`
enum Pending<'a, 'src> {
    Node(&'a AstNode<'src>),
    Text(&'static str),
}

/// Renders the tree as an s-expression, e.g. `(+ 1 (* 2 3))`.
impl fmt::Display for AstNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Pending::Node(self)];

        while let Some(next) = pending.pop() {
            let node = match next {
                Pending::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Pending::Node(node) => node,
            };

            match node {
                AstNode::NumberLiteral { value, .. } => write!(f, "{value}")?,
                AstNode::Identifier { name, .. } => f.write_str(name)?,
                AstNode::BinaryOp {
                    op, left, right, ..
                } => {
                    write!(f, "({op} ")?;
                    pending.push(Pending::Text(")"));
                    pending.push(Pending::Node(right));
                    pending.push(Pending::Text(" "));
                    pending.push(Pending::Node(left));
                }
                AstNode::Block { statements, .. } => {
                    f.write_str("(block")?;
                    pending.push(Pending::Text(")"));
                    for statement in statements.iter().rev() {
                        pending.push(Pending::Node(statement));
                        pending.push(Pending::Text(" "));
                    }
                }
                AstNode::Test { name, body, .. } => {
                    write!(f, "(test \"{name}\" ")?;
                    pending.push(Pending::Text(")"));
                    pending.push(Pending::Node(body));
                }
                AstNode::Assert { expr, .. } => {
                    f.write_str("(assert ")?;
                    pending.push(Pending::Text(")"));
                    pending.push(Pending::Node(expr));
                }
            }
        }

        Ok(())
    }
}
