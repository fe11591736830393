//! Pass 1: Command Collector
//!
//! Walks the command definitions in order and assigns each a table slot:
//! - Rejects names that shadow a built-in action or condition
//! - Rejects a second definition of the same name
//! - Picks the entry command (first declared, or the one the caller names)

use std::collections::HashMap;

use crate::builtins::is_builtin;
use crate::error::{Diagnostic, ErrorCode};
use crate::runtime::program::CommandId;
use crate::syntax::ast::{Program, Span};

#[derive(Debug, Default)]
pub struct CommandTable {
    ids: HashMap<String, (CommandId, Span)>,
}

impl CommandTable {
    pub fn get(&self, name: &str) -> Option<CommandId> {
        self.ids.get(name).map(|(id, _)| *id)
    }
}

pub struct Collector {
    table: CommandTable,
}

impl Collector {
    pub fn new() -> Self {
        Self { table: CommandTable::default() }
    }

    pub fn collect(mut self, program: &Program) -> Result<CommandTable, Diagnostic> {
        for (index, command) in program.commands.iter().enumerate() {
            let span = command.span;
            if is_builtin(&command.name) {
                return Err(Diagnostic::new(
                    ErrorCode::C004, span.line, span.column,
                    format!("cannot redefine built-in {}()", command.name),
                ));
            }
            if let Some((_, first)) = self.table.ids.get(&command.name) {
                return Err(Diagnostic::new(
                    ErrorCode::C003, span.line, span.column,
                    format!("duplicate command {}(), first declared on line {}", command.name, first.line),
                ));
            }
            self.table.ids.insert(command.name.clone(), (CommandId(index), span));
        }
        Ok(self.table)
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the entry command: `requested` if given, else the first one.
pub fn entry_point(table: &CommandTable, program: &Program, requested: Option<&str>) -> Result<CommandId, Diagnostic> {
    match requested {
        Some(name) => table.get(name).ok_or_else(|| {
            let span = program.entry().map(|c| c.span).unwrap_or(Span::new(1, 1));
            Diagnostic::new(ErrorCode::C002, span.line, span.column,
                format!("entry command {name}() not found"))
        }),
        None if program.commands.is_empty() => {
            Err(Diagnostic::new(ErrorCode::C002, 1, 1, "program declares no entry command"))
        }
        None => Ok(CommandId(0)),
    }
}
