//! Recursive-descent parser. Stops at the first grammar violation and
//! reports it as a `Diagnostic`; there is no error recovery.

use crate::builtins::{Primitive, Query};
use crate::error::{Diagnostic, ErrorCode};
use crate::syntax::ast::*;
use crate::syntax::token::{Token, TokenKind};

pub const MIN_REPEAT: u32 = 2;
pub const MAX_REPEAT: u32 = 32767;

/// Deepest allowed nesting of blocks, `else if` links and condition operators.
pub const MAX_NESTING: usize = 64;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// `tokens` must end with `Eof`, as produced by the lexer.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    pub fn parse(mut self) -> Result<Program, Diagnostic> {
        let mut commands = Vec::new();

        loop {
            match self.peek_kind() {
                TokenKind::Eof if !commands.is_empty() => break,
                TokenKind::Void => commands.push(self.parse_command()?),
                _ => return Err(self.misplaced_top_level()),
            }
        }

        Ok(Program { commands })
    }

    // ─── Commands ────────────────────────────────────────────────────────────

    fn parse_command(&mut self) -> Result<Command, Diagnostic> {
        let span = self.span();
        self.expect(TokenKind::Void, "void")?;
        let name = match self.peek_kind() {
            TokenKind::Ident(name) => { self.advance(); name }
            _ => return Err(self.missing("IDENTIFIER")),
        };
        self.expect(TokenKind::LParen, "(")?;
        self.expect(TokenKind::RParen, ")")?;
        let body = self.parse_block()?;
        Ok(Command { name, body, span })
    }

    /// Explains why the current token cannot start a top-level definition.
    fn misplaced_top_level(&self) -> Diagnostic {
        let (code, message) = match self.peek_kind() {
            TokenKind::RBrace => (ErrorCode::P001, "too many closing braces".to_string()),
            TokenKind::Repeat => (ErrorCode::P003, "repeat belongs inside command".to_string()),
            TokenKind::While  => (ErrorCode::P003, "while belongs inside command".to_string()),
            TokenKind::If     => (ErrorCode::P003, "if belongs inside command".to_string()),
            TokenKind::Else   => (ErrorCode::P003, "else belongs inside command".to_string()),
            TokenKind::Error(msg) => (ErrorCode::L001, msg),
            TokenKind::Ident(name) if self.looks_like_call() => (
                ErrorCode::P003,
                format!("Command calls belong inside command, move {name}() into a command body"),
            ),
            TokenKind::Ident(name) => (ErrorCode::P001, format!("expected void before {name}")),
            other => (ErrorCode::P001, format!("expected void, found {}", other.describe())),
        };
        self.error_here(code, message)
    }

    /// `name ( ) ;` ahead, as opposed to a definition lacking its `void`.
    fn looks_like_call(&self) -> bool {
        matches!(self.peek_kind_at(1), TokenKind::LParen)
            && matches!(self.peek_kind_at(2), TokenKind::RParen)
            && matches!(self.peek_kind_at(3), TokenKind::Semicolon)
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Vec<Stmt>, Diagnostic> {
        self.nested(Self::parse_braced)
    }

    fn parse_braced(&mut self) -> Result<Vec<Stmt>, Diagnostic> {
        let open = self.span();
        self.expect(TokenKind::LBrace, "{")?;
        let mut stmts = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::RBrace => { self.advance(); return Ok(stmts); }
                TokenKind::Eof => {
                    return Err(Diagnostic::new(
                        ErrorCode::P002, open.line, open.column,
                        "unclosed block, this { has no matching }",
                    ));
                }
                _ => stmts.push(self.parse_stmt()?),
            }
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        match self.peek_kind() {
            TokenKind::Ident(name) => self.parse_call(name),
            TokenKind::Repeat   => self.parse_repeat(),
            TokenKind::If       => self.parse_if().map(Stmt::If),
            TokenKind::While    => self.parse_while(),
            TokenKind::Void     => Err(self.misplaced_void()),
            TokenKind::Else     => Err(self.error_here(ErrorCode::P001, "else without matching if")),
            TokenKind::Error(msg) => Err(self.error_here(ErrorCode::L001, msg)),
            other => Err(self.error_here(
                ErrorCode::P001,
                format!("illegal start of statement: {}", other.describe()),
            )),
        }
    }

    /// `void` inside a body: either a nested definition or a call written
    /// with a superfluous `void`.
    fn misplaced_void(&self) -> Diagnostic {
        let mut n = 1;
        while matches!(self.peek_kind_at(n), TokenKind::Ident(_) | TokenKind::LParen | TokenKind::RParen) {
            n += 1;
        }
        if matches!(self.peek_kind_at(n), TokenKind::LBrace) {
            self.error_here(ErrorCode::P003, "Command definitions cannot be nested")
        } else {
            self.error_here(ErrorCode::P003, "void is only for command definitions, calls need no void")
        }
    }

    fn parse_call(&mut self, name: String) -> Result<Stmt, Diagnostic> {
        let span = self.span();
        self.advance();
        self.expect(TokenKind::LParen, "(")?;
        self.expect(TokenKind::RParen, ")")?;
        self.expect(TokenKind::Semicolon, ";")?;
        Ok(Stmt::Call { name, span })
    }

    fn parse_repeat(&mut self) -> Result<Stmt, Diagnostic> {
        let span = self.span();
        self.expect(TokenKind::Repeat, "repeat")?;
        self.expect(TokenKind::LParen, "(")?;
        let count = self.parse_repeat_count()?;
        self.expect(TokenKind::RParen, ")")?;
        let body = self.parse_block()?;
        Ok(Stmt::Repeat { count, body, span })
    }

    /// Range-checks the literal's exact decimal value, so a literal too large
    /// for any machine integer is still reported as written.
    fn parse_repeat_count(&mut self) -> Result<u16, Diagnostic> {
        let TokenKind::Number(digits) = self.peek_kind() else {
            return Err(self.missing("NUMBER"));
        };
        let significant = digits.trim_start_matches('0');
        let value = if significant.len() > 5 { None } else { Some(significant.parse::<u32>().unwrap_or(0)) };
        match value {
            Some(v) if (MIN_REPEAT..=MAX_REPEAT).contains(&v) => {
                self.advance();
                Ok(v as u16)
            }
            _ => Err(self.error_here(
                ErrorCode::P004,
                format!("{digits} out of range [{MIN_REPEAT}, {MAX_REPEAT}]"),
            )),
        }
    }

    fn parse_if(&mut self) -> Result<IfStmt, Diagnostic> {
        let span = self.span();
        self.expect(TokenKind::If, "if")?;
        self.expect(TokenKind::LParen, "(")?;
        let condition = self.parse_condition()?;
        self.expect(TokenKind::RParen, ")")?;
        let then_block = self.parse_block()?;
        let else_block = if self.matches(TokenKind::Else) {
            match self.peek_kind() {
                TokenKind::LBrace => Some(self.parse_block()?),
                TokenKind::If => Some(vec![Stmt::If(self.nested(Self::parse_if)?)]),
                _ => return Err(self.error_here(ErrorCode::P002, "else must be followed by { or if")),
            }
        } else {
            None
        };
        Ok(IfStmt { condition, then_block, else_block, span })
    }

    fn parse_while(&mut self) -> Result<Stmt, Diagnostic> {
        let span = self.span();
        self.expect(TokenKind::While, "while")?;
        self.expect(TokenKind::LParen, "(")?;
        let condition = self.parse_condition()?;
        self.expect(TokenKind::RParen, ")")?;
        let body = self.parse_block()?;
        Ok(Stmt::While { condition, body, span })
    }

    // ─── Conditions (precedence climbing) ────────────────────────────────────

    // Each operator folded in deepens the tree by one level.

    fn parse_condition(&mut self) -> Result<Condition, Diagnostic> {
        let outer = self.depth;
        let mut left = self.parse_and()?;
        while self.matches(TokenKind::OrOr) {
            self.descend()?;
            let right = self.parse_and()?;
            left = Condition::Or(Box::new(left), Box::new(right));
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Condition, Diagnostic> {
        let outer = self.depth;
        let mut left = self.parse_unary()?;
        while self.matches(TokenKind::AndAnd) {
            self.descend()?;
            let right = self.parse_unary()?;
            left = Condition::And(Box::new(left), Box::new(right));
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Condition, Diagnostic> {
        match self.peek_kind() {
            TokenKind::Bang => {
                self.advance();
                Ok(Condition::Not(Box::new(self.nested(Self::parse_unary)?)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.nested(Self::parse_condition)?;
                self.expect(TokenKind::RParen, ")")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.parse_query(name),
            TokenKind::Error(msg) => Err(self.error_here(ErrorCode::L001, msg)),
            _ => Err(self.missing("condition")),
        }
    }

    fn parse_query(&mut self, name: String) -> Result<Condition, Diagnostic> {
        let span = self.span();
        let Some(query) = Query::from_name(&name) else {
            let suggestion = match Primitive::from_name(&name) {
                Some(action) => format!("{}()", action.related_query()),
                None => Query::ALL.iter().map(|q| format!("{q}()")).collect::<Vec<_>>().join(", "),
            };
            return Err(self.error_here(
                ErrorCode::P005,
                format!("{name}() is not a condition. Did you mean a condition like {suggestion}?"),
            ));
        };
        self.advance();
        self.expect(TokenKind::LParen, "(")?;
        self.expect(TokenKind::RParen, ")")?;
        Ok(Condition::Query(query, span))
    }

    // ─── Nesting ─────────────────────────────────────────────────────────────

    /// One level deeper, or P006 at the current token past `MAX_NESTING`.
    fn descend(&mut self) -> Result<(), Diagnostic> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_here(
                ErrorCode::P006,
                format!("nesting too deep, at most {MAX_NESTING} levels are allowed"),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, Diagnostic>) -> Result<T, Diagnostic> {
        self.descend()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    /// Kind `n` tokens ahead; `Eof` past the end.
    fn peek_kind_at(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind.clone())
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.tokens[self.pos].kind == *kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(&kind) { self.advance(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, Diagnostic> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.missing(what))
        }
    }

    /// `missing <what>` at the current token, unless the current token is
    /// itself a lexical error, which is then reported instead.
    fn missing(&self, what: &str) -> Diagnostic {
        match self.peek_kind() {
            TokenKind::Error(msg) => self.error_here(ErrorCode::L001, msg),
            found => self.error_here(ErrorCode::P002, format!("missing {what} before {}", found.describe())),
        }
    }

    fn span(&self) -> Span {
        let tok = self.peek();
        Span::new(tok.line, tok.column)
    }

    fn error_here(&self, code: ErrorCode, message: impl Into<String>) -> Diagnostic {
        let tok = self.peek();
        Diagnostic::new(code, tok.line, tok.column, message)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
