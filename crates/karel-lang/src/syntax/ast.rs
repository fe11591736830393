use crate::builtins::Query;

/// Source location attached to every node for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ─── Top level ───────────────────────────────────────────────────────────────

/// Command definitions in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub commands: Vec<Command>,
}

impl Program {
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// The first declared command, where execution starts by default.
    pub fn entry(&self) -> Option<&Command> {
        self.commands.first()
    }
}

/// `void name() { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub body: Vec<Stmt>,
    pub span: Span,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name();`: a primitive action or a declared command
    Call { name: String, span: Span },
    /// `repeat (n) { }` with `n` already checked against [2, 32767]
    Repeat { count: u16, body: Vec<Stmt>, span: Span },
    /// `if (c) { } else { }`; `else if` nests a single `If` in `else_block`
    If(IfStmt),
    /// `while (c) { }`
    While { condition: Condition, body: Vec<Stmt>, span: Span },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Call { span, .. }   => *span,
            Stmt::Repeat { span, .. } => *span,
            Stmt::If(s)               => s.span,
            Stmt::While { span, .. }  => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Condition,
    pub then_block: Vec<Stmt>,
    pub else_block: Option<Vec<Stmt>>,
    pub span: Span,
}

// ─── Conditions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `frontIsClear()` etc.
    Query(Query, Span),
    /// `!c`
    Not(Box<Condition>),
    /// `a && b`
    And(Box<Condition>, Box<Condition>),
    /// `a || b`
    Or(Box<Condition>, Box<Condition>),
}
