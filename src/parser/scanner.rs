//! Scanner (tokenizer) for Modal source code
//!
//! Converts raw source text into [`Token`]s on demand. The scanner is an
//! explicit state machine: [`ScanMode`] alone decides how the next character
//! is read, and at most two characters of lookahead are ever inspected.
//!
//! The scanner never fails. Characters that match no rule come back as
//! [`TokenKind::Unknown`], and an unterminated string or block comment simply
//! runs to the end of the input. Deciding what is an error is left to the
//! parser.

use super::token::{Token, TokenKind};
use tracing::trace;

/// The scanner's internal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Start,
    Identifier,
    Integer,
    Float,
    String,
    LineComment,
    BlockComment,
}

/// State-machine scanner over a borrowed source buffer
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    source: &'src str,
    position: usize,
    line: usize,
    column: usize,
    mode: ScanMode,
}

impl<'src> Scanner<'src> {
    /// Create a new scanner positioned at the start of `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
            mode: ScanMode::Start,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Scan the whole input, end-of-file token included.
    pub fn tokenize(mut self) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
        }

        tokens
    }

    /// Produce the next token.
    ///
    /// Once the input is exhausted every call returns an end-of-file token at
    /// the final position.
    pub fn next_token(&mut self) -> Token<'src> {
        let token = self.scan();
        trace!(kind = ?token.kind, line = token.line, col = token.col, "scanned {:?}", token.text);
        token
    }

    fn scan(&mut self) -> Token<'src> {
        let mut start = self.position;
        let mut start_line = self.line;
        let mut start_column = self.column;

        loop {
            let Some(ch) = self.peek() else {
                return self.finish_input(start, start_line, start_column);
            };

            match self.mode {
                ScanMode::Start => {
                    start = self.position;
                    start_line = self.line;
                    start_column = self.column;

                    match ch {
                        ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c' => {
                            self.advance();
                        }
                        '"' => {
                            self.advance();
                            self.mode = ScanMode::String;
                        }
                        'a'..='z' | 'A'..='Z' | '_' => {
                            self.advance();
                            self.mode = ScanMode::Identifier;
                        }
                        '0'..='9' => {
                            self.advance();
                            self.mode = ScanMode::Integer;
                        }
                        '#' => return self.preprocessor_line(),
                        '-' if self.peek_next() == Some('-') => {
                            self.advance();
                            self.advance();
                            self.mode = ScanMode::LineComment;
                        }
                        '-' if self.peek_next() == Some('{') => {
                            self.advance();
                            self.advance();
                            self.mode = ScanMode::BlockComment;
                        }
                        _ => return self.punctuation(ch),
                    }
                }

                ScanMode::Identifier => {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        self.advance();
                    } else {
                        return self.close_run(start, start_line, start_column);
                    }
                }

                ScanMode::Integer => match ch {
                    '0'..='9' => {
                        self.advance();
                    }
                    '.' => {
                        self.advance();
                        self.mode = ScanMode::Float;
                    }
                    _ => return self.close_run(start, start_line, start_column),
                },

                // A second '.' is not part of the number
                ScanMode::Float => {
                    if ch.is_ascii_digit() {
                        self.advance();
                    } else {
                        return self.close_run(start, start_line, start_column);
                    }
                }

                ScanMode::String => match ch {
                    '\\' => {
                        self.advance();
                        self.advance();
                    }
                    '"' => {
                        self.advance();
                        return self.close_run(start, start_line, start_column);
                    }
                    _ => {
                        self.advance();
                    }
                },

                ScanMode::LineComment => {
                    if ch == '\n' {
                        self.mode = ScanMode::Start;
                    }
                    self.advance();
                }

                // No nesting: the first `}-` closes the comment
                ScanMode::BlockComment => {
                    if ch == '}' && self.peek_next() == Some('-') {
                        self.advance();
                        self.advance();
                        self.mode = ScanMode::Start;
                    } else {
                        self.advance();
                    }
                }
            }
        }
    }

    /// Emit the run that started at `start` and return to [`ScanMode::Start`].
    fn close_run(&mut self, start: usize, line: usize, column: usize) -> Token<'src> {
        let text = self.slice(start, self.position);
        let kind = match self.mode {
            ScanMode::Identifier => TokenKind::keyword(text).unwrap_or(TokenKind::Identifier),
            ScanMode::Integer | ScanMode::Float => TokenKind::Number,
            ScanMode::String => TokenKind::String,
            ScanMode::Start | ScanMode::LineComment | ScanMode::BlockComment => TokenKind::Unknown,
        };
        self.mode = ScanMode::Start;
        Token::new(kind, text, start, line, column)
    }

    /// Input is exhausted: flush an open run, otherwise report end-of-file.
    fn finish_input(&mut self, start: usize, line: usize, column: usize) -> Token<'src> {
        match self.mode {
            ScanMode::Identifier | ScanMode::Integer | ScanMode::Float | ScanMode::String => {
                self.close_run(start, line, column)
            }
            ScanMode::Start | ScanMode::LineComment | ScanMode::BlockComment => {
                self.mode = ScanMode::Start;
                Token::new(
                    TokenKind::Eof,
                    self.slice(self.position, self.position),
                    self.position,
                    self.line,
                    self.column,
                )
            }
        }
    }

    /// Consume a `#` line. A backslash right before the newline continues it.
    fn preprocessor_line(&mut self) -> Token<'src> {
        let start = self.position;
        let line = self.line;
        let column = self.column;

        while let Some(ch) = self.peek() {
            match ch {
                '\n' => break,
                '\\' if self.peek_next() == Some('\n') => {
                    self.advance();
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }

        Token::new(
            TokenKind::Preprocessor,
            self.slice(start, self.position),
            start,
            line,
            column,
        )
    }

    /// Classify punctuation starting with `ch`, taking the longest operator.
    fn punctuation(&mut self, ch: char) -> Token<'src> {
        let start = self.position;
        let line = self.line;
        let column = self.column;
        self.advance();

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '?' => {
                if self.eat('?') {
                    if self.eat('=') {
                        TokenKind::QuestionQuestionEq
                    } else {
                        TokenKind::QuestionQuestion
                    }
                } else if self.eat('.') {
                    TokenKind::QuestionDot
                } else {
                    TokenKind::Question
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else if self.eat('.') {
                    TokenKind::DotDot
                } else {
                    TokenKind::Operator
                }
            }
            '-' => {
                if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Operator
                }
            }
            ':' => {
                if self.eat(':') {
                    TokenKind::ColonColon
                } else {
                    TokenKind::Operator
                }
            }
            '|' => TokenKind::Pipe,
            '+' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '^' | '~' | ';' | ',' | '['
            | ']' => TokenKind::Operator,
            _ => TokenKind::Unknown,
        };

        Token::new(kind, self.slice(start, self.position), start, line, column)
    }

    fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.source[start..end]
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    /// Peek one character past the current one
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.position..].chars();
        chars.next();
        chars.next()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .tokenize()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        Scanner::new(source)
            .tokenize()
            .into_iter()
            .map(|token| token.text)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Scanner::new("test \"adds\" { assert 1 + 2 }").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Test);
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "\"adds\"");
        assert_eq!(tokens[2].kind, TokenKind::LBrace);
        assert_eq!(tokens[3].kind, TokenKind::Assert);
        assert_eq!(tokens[4].kind, TokenKind::Number);
        assert!(tokens[5].is_operator("+"));
        assert_eq!(tokens[6].kind, TokenKind::Number);
        assert_eq!(tokens[7].kind, TokenKind::RBrace);
        assert_eq!(tokens[8].kind, TokenKind::Eof);
        assert_eq!(tokens.len(), 9);
    }

    #[test]
    fn test_compound_operators() {
        assert_eq!(
            kinds("? ?? ??= ?. . .. ... - -> : :: |"),
            vec![
                TokenKind::Question,
                TokenKind::QuestionQuestion,
                TokenKind::QuestionQuestionEq,
                TokenKind::QuestionDot,
                TokenKind::Operator,
                TokenKind::DotDot,
                TokenKind::Ellipsis,
                TokenKind::Operator,
                TokenKind::Arrow,
                TokenKind::Operator,
                TokenKind::ColonColon,
                TokenKind::Pipe,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_greedy_operators_without_spaces() {
        assert_eq!(texts("a??=b"), vec!["a", "??=", "b", ""]);
        assert_eq!(texts("x->y"), vec!["x", "->", "y", ""]);
        assert_eq!(texts("...."), vec!["...", ".", ""]);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("defer autofree fn fun alias use comptime union asm volatile async await and or sizeof"),
            vec![
                TokenKind::Defer,
                TokenKind::Autofree,
                TokenKind::Function,
                TokenKind::Function,
                TokenKind::Alias,
                TokenKind::Use,
                TokenKind::Comptime,
                TokenKind::Union,
                TokenKind::Asm,
                TokenKind::Volatile,
                TokenKind::Async,
                TokenKind::Await,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Sizeof,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("testing Assert _under score9"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts("42 3.14 7."), vec!["42", "3.14", "7.", ""]);
        // a second dot ends the run
        assert_eq!(texts("1.2.3"), vec!["1.2", ".", "3", ""]);
        assert_eq!(
            kinds("1..2"),
            vec![
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_runs_closed_by_end_of_input() {
        assert_eq!(texts("assert 1"), vec!["assert", "1", ""]);
        assert_eq!(texts("foo"), vec!["foo", ""]);
        assert_eq!(texts("2.5"), vec!["2.5", ""]);
    }

    #[test]
    fn test_comments() {
        let source = "a -- line comment\nb -{ block\ncomment }- c";
        assert_eq!(texts(source), vec!["a", "b", "c", ""]);

        let tokens = Scanner::new(source).tokenize();
        assert_eq!((tokens[1].line, tokens[1].col), (2, 1));
        assert_eq!((tokens[2].line, tokens[2].col), (3, 12));
    }

    #[test]
    fn test_block_comments_do_not_nest() {
        assert_eq!(texts("-{ -{ inner }- x }-"), vec!["x", "}", "-", ""]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert_eq!(kinds("a -{ never closed"), vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn test_string_literal() {
        let tokens = Scanner::new(r#""hello \"quoted\" world" x"#).tokenize();

        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, r#""hello \"quoted\" world""#);
        assert_eq!(tokens[1].text, "x");
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = Scanner::new("\"unterminated").tokenize();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "\"unterminated");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_string_ending_in_backslash() {
        let tokens = Scanner::new("\"abc\\").tokenize();
        assert_eq!(tokens[0].text, "\"abc\\");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_multiline_string_location() {
        let tokens = Scanner::new("\"one\ntwo\" after").tokenize();

        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!(tokens[1].text, "after");
        assert_eq!((tokens[1].line, tokens[1].col), (2, 6));
    }

    #[test]
    fn test_preprocessor_line() {
        let tokens = Scanner::new("#include <core>\nassert x").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Preprocessor);
        assert_eq!(tokens[0].text, "#include <core>");
        assert_eq!(tokens[1].kind, TokenKind::Assert);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_preprocessor_continuation() {
        let tokens = Scanner::new("#define X \\\n  1\nx").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Preprocessor);
        assert_eq!(tokens[0].text, "#define X \\\n  1");
        assert_eq!(tokens[1].text, "x");
        assert_eq!((tokens[1].line, tokens[1].col), (3, 1));
    }

    #[test]
    fn test_unknown_characters() {
        let tokens = Scanner::new("@ $ é").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Unknown);
        assert_eq!(tokens[0].text, "@");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[2].kind, TokenKind::Unknown);
        assert_eq!(tokens[2].text, "é");
        assert_eq!(tokens[2].col, 5);
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut scanner = Scanner::new("x");
        assert_eq!(scanner.next_token().text, "x");

        let first = scanner.next_token();
        assert_eq!(first.kind, TokenKind::Eof);
        for _ in 0..5 {
            let again = scanner.next_token();
            assert_eq!(again.kind, TokenKind::Eof);
            assert_eq!(again.offset, first.offset);
            assert_eq!((again.line, again.col), (first.line, first.col));
        }
        assert_eq!(scanner.mode(), ScanMode::Start);
    }

    #[test]
    fn test_empty_input() {
        let mut scanner = Scanner::new("");
        let token = scanner.next_token();
        assert_eq!(token.kind, TokenKind::Eof);
        assert_eq!((token.line, token.col, token.len()), (1, 1, 0));
    }

    #[test]
    fn test_all_whitespace_is_skipped() {
        assert_eq!(texts(" \t\r\n\x0b\x0c a\x0bb"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_cursor_tracks_line_and_column() {
        let mut scanner = Scanner::new("ab\n  cd");
        assert_eq!((scanner.line(), scanner.column()), (1, 1));

        scanner.next_token();
        assert_eq!((scanner.line(), scanner.column()), (1, 3));

        let token = scanner.next_token();
        assert_eq!(token.text, "cd");
        assert_eq!((scanner.line(), scanner.column()), (2, 5));
    }

    #[test]
    fn test_mode_returns_to_start_between_tokens() {
        let mut scanner = Scanner::new("abc 12 \"s\"");
        for _ in 0..4 {
            scanner.next_token();
            assert_eq!(scanner.mode(), ScanMode::Start);
        }
    }
}
