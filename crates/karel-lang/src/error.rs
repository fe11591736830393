use crate::world::Direction;

/// Error codes prefixed by phase: L = lexer, P = parser, C = compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexer
    L001, // unrecognised input, surfaced through an error token

    // Parser
    P001, // unexpected token / illegal start of statement
    P002, // missing expected token
    P003, // construct in the wrong place (top level, nested, `void` call)
    P004, // repeat count out of range
    P005, // non-condition used as a condition
    P006, // blocks or conditions nested too deep

    // Compiler
    C001, // undefined command
    C002, // entry command not found
    C003, // duplicate command
    C004, // built-in redefined
    C005, // condition called as a statement
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::P001 => "P001",
            Self::P002 => "P002",
            Self::P003 => "P003",
            Self::P004 => "P004",
            Self::P005 => "P005",
            Self::P006 => "P006",
            Self::C001 => "C001",
            Self::C002 => "C002",
            Self::C003 => "C003",
            Self::C004 => "C004",
            Self::C005 => "C005",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positioned report of a lexical, syntactic or compile error.
///
/// The message wording is part of the contract: learners and tests match on
/// substrings such as `missing (` or `out of range`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{code}] {line}:{column}: {message}")]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }
}

// ─────────────────────────────────────────────────────────────────────────────

/// Why a run stopped early. Positions are the robot's cell when the fault hit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaultKind {
    #[error("cannot move through wall at ({x}, {y}) facing {direction}")]
    Blocked { x: u8, y: u8, direction: Direction },

    #[error("there is no beeper to pick at ({x}, {y})")]
    NoBeeper { x: u8, y: u8 },

    #[error("cannot drop a beeper at ({x}, {y}), there is already one")]
    BeeperPresent { x: u8, y: u8 },

    #[error("call depth {depth} exceeded when calling `{command}`")]
    CallDepthExceeded { command: String, depth: usize },

    #[error("step budget of {budget} exhausted")]
    StepBudgetExceeded { budget: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[runtime] line {line}: {kind}")]
pub struct Fault {
    pub line: usize,
    pub kind: FaultKind,
}

impl Fault {
    pub fn new(line: usize, kind: FaultKind) -> Self {
        Self { line, kind }
    }
}
