#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Ident(String),
    Number(String), // raw digits, range-checked by the parser

    // Keywords
    Void,
    Repeat,
    If,
    Else,
    While,

    // Condition operators
    Bang,   // !
    AndAnd, // &&
    OrOr,   // ||

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Semicolon, // ;

    /// Unrecognised input. Carries the message the parser reports.
    Error(String),

    Eof,
}

impl TokenKind {
    /// How the token is named in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(s)  => s.clone(),
            Self::Number(s) => s.clone(),
            Self::Void      => "void".into(),
            Self::Repeat    => "repeat".into(),
            Self::If        => "if".into(),
            Self::Else      => "else".into(),
            Self::While     => "while".into(),
            Self::Bang      => "!".into(),
            Self::AndAnd    => "&&".into(),
            Self::OrOr      => "||".into(),
            Self::LParen    => "(".into(),
            Self::RParen    => ")".into(),
            Self::LBrace    => "{".into(),
            Self::RBrace    => "}".into(),
            Self::Semicolon => ";".into(),
            Self::Error(_)  => "invalid input".into(),
            Self::Eof       => "end of file".into(),
        }
    }
}

/// Maps an identifier string to its keyword token, or returns `Ident`.
pub fn keyword_or_ident(s: String) -> TokenKind {
    match s.as_str() {
        "void"   => TokenKind::Void,
        "repeat" => TokenKind::Repeat,
        "if"     => TokenKind::If,
        "else"   => TokenKind::Else,
        "while"  => TokenKind::While,
        _        => TokenKind::Ident(s),
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}
