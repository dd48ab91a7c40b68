//! Single-pass tokenizer over UTF-8 source text.
//!
//! The lexer walks the source byte by byte, accumulating at most one lexeme
//! at a time and flushing it whenever a boundary is reached: whitespace, a
//! newline, a comment opener, an operator or a punctuation sign. Flushed runs
//! are classified in order: number, decimal, known keyword, identifier; a
//! non-empty run matching none of these is an unknown token.
//!
//! Tokens are allocated in the session's token arena; the returned stream
//! holds handles in source order.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::arena::Handle;
use crate::compile::Session;
use crate::error::{Diagnostic, DiagnosticKind, Phase};
use crate::intern::Name;
use crate::stream::Stream;
use crate::token::{Span, Token, TokenKind};

pub type TokenId = Handle<Token>;

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("import", TokenKind::Import),
        ("fun", TokenKind::Function),
        ("mod", TokenKind::Mod),
        ("str", TokenKind::Str),
        ("num", TokenKind::Num),
        ("dec", TokenKind::Dec),
        ("nothing", TokenKind::Nothing),
        ("bool", TokenKind::Bool),
        ("step", TokenKind::Step),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("let", TokenKind::Let),
        ("const", TokenKind::Const),
        ("pub", TokenKind::Pub),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("elseif", TokenKind::ElseIf),
        ("for", TokenKind::For),
        ("while", TokenKind::While),
        ("return", TokenKind::Return),
        ("to", TokenKind::To),
        ("in", TokenKind::In),
        ("package", TokenKind::Package),
        ("derive", TokenKind::Derive),
    ])
});

fn single_punct(c: u8) -> Option<TokenKind> {
    Some(match c {
        b'{' => TokenKind::OpenCurly,
        b'}' => TokenKind::CloseCurly,
        b'(' => TokenKind::OpenParen,
        b')' => TokenKind::CloseParen,
        b'[' => TokenKind::OpenBracket,
        b']' => TokenKind::CloseBracket,
        b';' => TokenKind::Semicolon,
        b',' => TokenKind::Comma,
        b':' => TokenKind::Colon,
        b'=' => TokenKind::Equals,
        b'+' => TokenKind::Plus,
        b'-' => TokenKind::Minus,
        b'*' => TokenKind::Multiply,
        b'/' => TokenKind::Divide,
        b'!' => TokenKind::Not,
        b'&' => TokenKind::Ampersand,
        b'<' => TokenKind::BoolLt,
        b'>' => TokenKind::BoolGt,
        _ => return None,
    })
}

fn double_punct(a: u8, b: u8) -> Option<TokenKind> {
    Some(match (a, b) {
        (b'&', b'&') => TokenKind::And,
        (b'|', b'|') => TokenKind::Or,
        (b'=', b'=') => TokenKind::BoolEq,
        (b'!', b'=') => TokenKind::BoolNeq,
        (b'>', b'=') => TokenKind::BoolGte,
        (b'<', b'=') => TokenKind::BoolLte,
        (b'-', b'>') => TokenKind::Arrow,
        _ => return None,
    })
}

/// Tokenizes `source`, storing tokens in the session's arena.
pub fn lex(source: &str, cx: &mut Session) -> Result<Stream<TokenId>, Diagnostic> {
    Lexer::new(source, cx).run()
}

struct Lexer<'a, 's> {
    text: &'a str,
    bytes: &'a [u8],
    cx: &'s mut Session,
    out: Stream<TokenId>,
    line: usize,
    col: usize,
    /// Byte index where the current lexeme begins.
    start: usize,
    /// Bytes accumulated in the current lexeme.
    len: usize,
    identifier: bool,
    num: bool,
    dec: bool,
}

impl<'a, 's> Lexer<'a, 's> {
    fn new(source: &'a str, cx: &'s mut Session) -> Self {
        Lexer {
            text: source,
            bytes: source.as_bytes(),
            cx,
            out: Stream::default(),
            line: 1,
            col: 1,
            start: 0,
            len: 0,
            identifier: false,
            num: false,
            dec: false,
        }
    }

    fn run(mut self) -> Result<Stream<TokenId>, Diagnostic> {
        let mut i = 0;
        let mut in_string = false;
        let mut block_comment = false;
        // Positions for unterminated-construct errors.
        let mut string_line = 0;
        let mut string_col = 0;
        let mut comment_line = 0;
        let mut comment_col = 0;

        while i < self.bytes.len() {
            let c = self.bytes[i];

            if block_comment {
                if c == b'\n' {
                    self.line += 1;
                    self.col = 1;
                    i += 1;
                    continue;
                }
                // First `*/` closes the comment regardless of nesting.
                if c == b'*' && self.bytes.get(i + 1) == Some(&b'/') {
                    block_comment = false;
                    self.col += 2;
                    i += 2;
                    self.start = i;
                    continue;
                }
                self.col += 1;
                i += 1;
                continue;
            }

            if in_string {
                match c {
                    b'"' => {
                        let value = self
                            .cx
                            .interner
                            .intern_span(self.text, Span::new(self.start, i));
                        self.push(
                            TokenKind::StringLiteral,
                            Some(value),
                            Span::new(self.start - 1, i + 1),
                            string_line,
                            string_col,
                        );
                        in_string = false;
                        self.col += 1;
                        i += 1;
                        self.start = i;
                        self.len = 0;
                    }
                    b'\n' => {
                        return Err(self.err(
                            DiagnosticKind::UnclosedString,
                            string_line,
                            string_col,
                            "newline inside string literal",
                        ));
                    }
                    b'\\' => {
                        // Single-level escape: the next byte never closes the
                        // string. No escape decoding happens here.
                        if i + 1 < self.bytes.len() && self.bytes[i + 1] != b'\n' {
                            self.col += 2;
                            i += 2;
                        } else {
                            self.col += 1;
                            i += 1;
                        }
                    }
                    _ => {
                        self.col += 1;
                        i += 1;
                    }
                }
                continue;
            }

            match c {
                b' ' | b'\t' | b'\r' => {
                    self.flush()?;
                    self.col += 1;
                    i += 1;
                    self.start = i;
                    continue;
                }
                b'\n' => {
                    self.flush()?;
                    self.line += 1;
                    self.col = 1;
                    i += 1;
                    self.start = i;
                    continue;
                }
                b'"' => {
                    self.flush()?;
                    in_string = true;
                    string_line = self.line;
                    string_col = self.col + 1;
                    self.col += 1;
                    i += 1;
                    self.start = i;
                    continue;
                }
                b'/' if self.bytes.get(i + 1) == Some(&b'/') => {
                    self.flush()?;
                    while i < self.bytes.len() && self.bytes[i] != b'\n' {
                        i += 1;
                    }
                    self.start = i;
                    continue;
                }
                b'/' if self.bytes.get(i + 1) == Some(&b'*') => {
                    self.flush()?;
                    block_comment = true;
                    comment_line = self.line;
                    comment_col = self.col;
                    self.col += 2;
                    i += 2;
                    continue;
                }
                _ => {}
            }

            if let Some(&n) = self.bytes.get(i + 1) {
                if let Some(kind) = double_punct(c, n) {
                    self.flush()?;
                    let (line, col) = (self.line, self.col);
                    self.push(kind, None, Span::new(i, i + 2), line, col);
                    self.col += 2;
                    i += 2;
                    self.start = i;
                    continue;
                }
            }

            if let Some(kind) = single_punct(c) {
                self.flush()?;
                let (line, col) = (self.line, self.col);
                self.push(kind, None, Span::new(i, i + 1), line, col);
                self.col += 1;
                i += 1;
                self.start = i;
                continue;
            }

            if c == b'.' {
                if self.num {
                    if self.dec {
                        return Err(self.err(
                            DiagnosticKind::UnknownToken,
                            self.line,
                            self.col,
                            "second decimal point in number literal",
                        ));
                    }
                    self.dec = true;
                    self.col += 1;
                    self.len += 1;
                    i += 1;
                    continue;
                }
                self.flush()?;
                let (line, col) = (self.line, self.col);
                self.push(TokenKind::Dot, None, Span::new(i, i + 1), line, col);
                self.col += 1;
                i += 1;
                self.start = i;
                continue;
            }

            if self.len == 0 {
                self.start = i;
                if c.is_ascii_alphabetic() || c == b'_' {
                    self.identifier = true;
                } else if c.is_ascii_digit() {
                    self.num = true;
                }
            } else if self.identifier && !(c.is_ascii_alphanumeric() || c == b'_') {
                return Err(self.err(
                    DiagnosticKind::UnknownToken,
                    self.line,
                    self.col,
                    "invalid character in identifier",
                ));
            } else if self.num && !c.is_ascii_digit() {
                return Err(self.err(
                    DiagnosticKind::UnknownToken,
                    self.line,
                    self.col,
                    "invalid character in number literal",
                ));
            }

            self.col += 1;
            self.len += 1;
            i += 1;
        }

        if in_string {
            return Err(self.err(
                DiagnosticKind::UnclosedString,
                string_line,
                string_col,
                "string literal is never closed",
            ));
        }
        if block_comment {
            return Err(self.err(
                DiagnosticKind::UnclosedComment,
                comment_line,
                comment_col,
                "block comment is never closed",
            ));
        }
        self.flush()?;

        Ok(self.out)
    }

    /// Classifies and emits the accumulated lexeme, if any.
    fn flush(&mut self) -> Result<(), Diagnostic> {
        if self.len == 0 {
            return Ok(());
        }

        let source: &'a str = self.text;
        let text = &source[self.start..self.start + self.len];
        let column = self.col - self.len;
        let span = Span::new(self.start, self.start + self.len);

        let (kind, value) = if self.num {
            let kind = if self.dec {
                TokenKind::DecimalLiteral
            } else {
                TokenKind::NumberLiteral
            };
            (kind, Some(self.cx.interner.intern_span(source, span)))
        } else if let Some(&keyword) = KEYWORDS.get(text) {
            (keyword, None)
        } else if self.identifier {
            (TokenKind::Identifier, Some(self.cx.interner.intern_span(source, span)))
        } else {
            return Err(self.err(
                DiagnosticKind::UnknownToken,
                self.line,
                column,
                format!("unrecognized token `{}`", text),
            ));
        };

        let line = self.line;
        self.push(kind, value, span, line, column);
        self.identifier = false;
        self.num = false;
        self.dec = false;
        self.len = 0;
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, value: Option<Name>, span: Span, line: usize, column: usize) {
        let id = self.cx.tokens.alloc(Token::new(kind, value, span, line, column));
        self.out.push(id);
    }

    fn err(
        &self,
        kind: DiagnosticKind,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic::new(Phase::Lexer, kind, line, column, message)
    }
}
