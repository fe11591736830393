pub mod analysis;
pub mod builtins;
pub mod error;
pub mod runtime;
pub mod syntax;
pub mod world;

pub use builtins::{Primitive, Query};
pub use error::{Diagnostic, ErrorCode, Fault, FaultKind};
pub use runtime::{
    execute, Executable, Observer, Outcome, Recorder, RunControl, Vm, WorldSlot,
    DEFAULT_MAX_DEPTH, DEFAULT_STEP_BUDGET,
};
pub use syntax::token::{Token, TokenKind};
pub use world::{Direction, FloorPlan, FloorPlanBuilder, World};

use log::trace;

use syntax::ast::Program;
use syntax::lexer::Lexer;
use syntax::parser::Parser;

// ─── Public API ───────────────────────────────────────────────────────────────

/// Lex and parse only. Returns the AST or the first syntax diagnostic.
pub fn check(source: &str) -> Result<Program, Diagnostic> {
    trace!("Lexing {source}");
    let tokens = Lexer::new(source).tokenize();
    trace!("Parsing {tokens:#?}");
    let program = Parser::new(tokens).parse()?;
    trace!("Parsed {program:#?}");
    Ok(program)
}

/// Parse and compile source text; the first declared command is the entry.
pub fn compile(source: &str) -> Result<Executable, Diagnostic> {
    let program = check(source)?;
    analysis::compile(&program, None)
}

/// Like `compile`, but starts at the command called `entry`.
pub fn compile_entry(source: &str, entry: &str) -> Result<Executable, Diagnostic> {
    let program = check(source)?;
    analysis::compile(&program, Some(entry))
}
