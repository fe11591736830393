pub mod collector;
pub mod lowering;


use log::debug;

use crate::error::Diagnostic;
use crate::runtime::program::Executable;
use crate::syntax::ast;
use collector::{Collector, entry_point};
use lowering::Lowering;

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Full compiler pipeline:
/// 1. Collector: command table, duplicate and built-in name checks
/// 2. Entry:     first command, or `entry` when given
/// 3. Lowering:  one executable node per statement, calls resolved
///
/// The first failing check is returned; nothing is partially compiled.
pub fn compile(program: &ast::Program, entry: Option<&str>) -> Result<Executable, Diagnostic> {
    let table = Collector::new().collect(program)?;
    let entry = entry_point(&table, program, entry)?;
    let commands = Lowering::new(&table).lower(program)?;

    debug!(
        "compiled {} command(s), entry {}()",
        commands.len(),
        commands[entry.index()].name,
    );
    Ok(Executable::new(entry, commands))
}
