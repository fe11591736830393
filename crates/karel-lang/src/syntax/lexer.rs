use std::iter::Peekable;
use std::str::CharIndices;

use crate::syntax::token::{keyword_or_ident, Token, TokenKind};

/// Turns source text into positioned tokens. Never fails: anything it does
/// not recognise becomes a `TokenKind::Error` for the parser to report.
/// Columns count characters, not bytes.
pub struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, chars: src.char_indices().peekable(), line: 1, column: 1 }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut out = Vec::new();
        while let Some(tok) = self.scan() {
            out.push(tok);
        }
        out.push(Token::new(TokenKind::Eof, self.line, self.column));
        out
    }

    /// Next real token, skipping blanks and comments. `None` at end of input.
    fn scan(&mut self) -> Option<Token> {
        loop {
            self.eat_while(char::is_whitespace);
            let (line, column) = (self.line, self.column);
            let (start, c) = self.bump()?;

            let kind = match c {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ';' => TokenKind::Semicolon,
                '!' => TokenKind::Bang,
                '&' => self.doubled('&', TokenKind::AndAnd),
                '|' => self.doubled('|', TokenKind::OrOr),

                '/' if self.bump_if('/') => {
                    self.eat_while(|c| c != '\n');
                    continue;
                }
                '/' if self.bump_if('*') => {
                    if self.block_comment() {
                        continue;
                    }
                    TokenKind::Error("unclosed comment".into())
                }

                '0'..='9' => {
                    let end = self.eat_while(|c| c.is_ascii_digit());
                    TokenKind::Number(self.src[start..end].to_string())
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let end = self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
                    keyword_or_ident(self.src[start..end].to_string())
                }

                other => TokenKind::Error(format!("unexpected character `{other}`")),
            };
            return Some(Token::new(kind, line, column));
        }
    }

    /// `&&` / `||`; a single one is a lexical error.
    fn doubled(&mut self, c: char, kind: TokenKind) -> TokenKind {
        if self.bump_if(c) {
            kind
        } else {
            TokenKind::Error(format!("expected `{c}{c}`, bare `{c}` is not valid"))
        }
    }

    /// Consumes up to and including `*/`. False if the input ends first.
    fn block_comment(&mut self) -> bool {
        while let Some((_, c)) = self.bump() {
            if c == '*' && self.bump_if('/') {
                return true;
            }
        }
        false
    }

    // ─── Cursor ──────────────────────────────────────────────────────────────

    fn bump(&mut self) -> Option<(usize, char)> {
        let (i, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some((i, c))
    }

    fn bump_if(&mut self, expected: char) -> bool {
        if self.chars.peek().is_some_and(|&(_, c)| c == expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Skips characters matching `pred`; returns the byte offset reached.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        while let Some(&(i, c)) = self.chars.peek() {
            if !pred(c) {
                return i;
            }
            self.bump();
        }
        self.src.len()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
