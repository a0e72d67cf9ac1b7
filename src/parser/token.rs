//! Token definitions shared by the scanner, the parser and the AST
//!
//! A [`Token`] is a small `Copy` value that borrows its text from the source
//! buffer. Nothing is copied out of the source, so the buffer must outlive
//! every token and every node built from one; the `'src` lifetime makes the
//! compiler enforce that.

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Every kind of token the scanner can produce.
///
/// The set is closed: the parser matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    #[default]
    Eof,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,

    /// Single-character punctuation not classified further (`+`, `;`, `=` ...)
    Operator,
    Identifier,
    Unknown,
    /// Integer or float literal; the text tells which
    Number,
    /// String literal, quotes included
    String,
    /// `#...` line, continuation lines included
    Preprocessor,

    // Reserved words
    Test,
    Assert,
    Sizeof,
    Defer,
    Autofree,
    Function,
    Alias,
    Use,
    Comptime,
    Union,
    Asm,
    Volatile,
    Async,
    Await,
    And,
    Or,

    // Compound operators
    QuestionDot,        // ?.
    QuestionQuestionEq, // ??=
    QuestionQuestion,   // ??
    Question,           // ?
    Pipe,               // |
    ColonColon,         // ::
    Ellipsis,           // ...
    DotDot,             // ..
    Arrow,              // ->
}

/// Reserved words, matched case-sensitively against complete identifier runs.
pub static KEYWORDS: &[(&str, TokenKind)] = &[
    ("test", TokenKind::Test),
    ("assert", TokenKind::Assert),
    ("sizeof", TokenKind::Sizeof),
    ("defer", TokenKind::Defer),
    ("autofree", TokenKind::Autofree),
    ("fn", TokenKind::Function),
    ("fun", TokenKind::Function),
    ("alias", TokenKind::Alias),
    ("use", TokenKind::Use),
    ("comptime", TokenKind::Comptime),
    ("union", TokenKind::Union),
    ("asm", TokenKind::Asm),
    ("volatile", TokenKind::Volatile),
    ("async", TokenKind::Async),
    ("await", TokenKind::Await),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
];

impl TokenKind {
    /// Looks up a keyword; `None` means the run is a plain identifier.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == text)
            .map(|(_, kind)| *kind)
    }

    /// Reserved words that the grammar does not give any meaning yet.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            TokenKind::Sizeof
                | TokenKind::Defer
                | TokenKind::Autofree
                | TokenKind::Function
                | TokenKind::Alias
                | TokenKind::Use
                | TokenKind::Comptime
                | TokenKind::Union
                | TokenKind::Asm
                | TokenKind::Volatile
                | TokenKind::Async
                | TokenKind::Await
                | TokenKind::And
                | TokenKind::Or
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Operator => write!(f, "operator"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Unknown => write!(f, "unknown token"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string literal"),
            TokenKind::Preprocessor => write!(f, "preprocessor line"),
            TokenKind::Test => write!(f, "'test'"),
            TokenKind::Assert => write!(f, "'assert'"),
            TokenKind::Sizeof => write!(f, "'sizeof'"),
            TokenKind::Defer => write!(f, "'defer'"),
            TokenKind::Autofree => write!(f, "'autofree'"),
            TokenKind::Function => write!(f, "'fn'"),
            TokenKind::Alias => write!(f, "'alias'"),
            TokenKind::Use => write!(f, "'use'"),
            TokenKind::Comptime => write!(f, "'comptime'"),
            TokenKind::Union => write!(f, "'union'"),
            TokenKind::Asm => write!(f, "'asm'"),
            TokenKind::Volatile => write!(f, "'volatile'"),
            TokenKind::Async => write!(f, "'async'"),
            TokenKind::Await => write!(f, "'await'"),
            TokenKind::And => write!(f, "'and'"),
            TokenKind::Or => write!(f, "'or'"),
            TokenKind::QuestionDot => write!(f, "'?.'"),
            TokenKind::QuestionQuestionEq => write!(f, "'??='"),
            TokenKind::QuestionQuestion => write!(f, "'??'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::ColonColon => write!(f, "'::'"),
            TokenKind::Ellipsis => write!(f, "'...'"),
            TokenKind::DotDot => write!(f, "'..'"),
            TokenKind::Arrow => write!(f, "'->'"),
        }
    }
}

/// A scanned token: a kind plus a view into the source buffer.
///
/// `Token::default()` is the zero token the parser uses as `previous` before
/// the first advance: end-of-file kind, empty text, line and column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The exact source text of the token
    pub text: &'src str,
    /// Byte offset of the first character in the source
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, offset: usize, line: usize, col: usize) -> Self {
        Self {
            kind,
            text,
            offset,
            line,
            col,
        }
    }

    /// Length of the token in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.col)
    }

    /// True for an operator token spelled exactly `symbol`.
    pub fn is_operator(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == symbol
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Number => write!(f, "number {}", self.text),
            TokenKind::String => write!(f, "string literal {}", self.text),
            TokenKind::Operator | TokenKind::Unknown => write!(f, "'{}'", self.text),
            kind => write!(f, "{kind}"),
        }
    }
}
