//! Pass 2: Lowering
//!
//! Translates each statement one-to-one into an executable node. Calls are
//! resolved here: a primitive becomes `Node::Action`, a declared command a
//! `Node::Call` carrying its table index. No optimisation happens.

use crate::builtins::{Primitive, Query};
use crate::error::{Diagnostic, ErrorCode};
use crate::runtime::program::{CompiledCommand, Node};
use crate::syntax::ast::{Program, Span, Stmt};
use super::collector::CommandTable;

pub struct Lowering<'a> {
    table: &'a CommandTable,
}

impl<'a> Lowering<'a> {
    pub fn new(table: &'a CommandTable) -> Self {
        Self { table }
    }

    pub fn lower(&self, program: &Program) -> Result<Vec<CompiledCommand>, Diagnostic> {
        program.commands.iter()
            .map(|c| Ok(CompiledCommand {
                name: c.name.clone(),
                body: self.lower_block(&c.body)?,
                line: c.span.line,
            }))
            .collect()
    }

    fn lower_block(&self, stmts: &[Stmt]) -> Result<Vec<Node>, Diagnostic> {
        stmts.iter().map(|s| self.lower_stmt(s)).collect()
    }

    fn lower_stmt(&self, stmt: &Stmt) -> Result<Node, Diagnostic> {
        match stmt {
            Stmt::Call { name, span } => self.lower_call(name, *span),

            Stmt::Repeat { count, body, span } => Ok(Node::Repeat {
                count: *count,
                body: self.lower_block(body)?,
                line: span.line,
            }),

            Stmt::If(s) => Ok(Node::If {
                condition: s.condition.clone(),
                then_block: self.lower_block(&s.then_block)?,
                else_block: match &s.else_block {
                    Some(block) => self.lower_block(block)?,
                    None => Vec::new(),
                },
                line: s.span.line,
            }),

            Stmt::While { condition, body, span } => Ok(Node::While {
                condition: condition.clone(),
                body: self.lower_block(body)?,
                line: span.line,
            }),
        }
    }

    fn lower_call(&self, name: &str, span: Span) -> Result<Node, Diagnostic> {
        if let Some(primitive) = Primitive::from_name(name) {
            return Ok(Node::Action { primitive, line: span.line });
        }
        if let Some(target) = self.table.get(name) {
            return Ok(Node::Call { target, line: span.line });
        }
        let (code, message) = match Query::from_name(name) {
            Some(_) => (ErrorCode::C005, format!("{name}() is a condition, use it inside if or while")),
            None => (ErrorCode::C001, format!("undefined command {name}()")),
        };
        Err(Diagnostic::new(code, span.line, span.column, message))
    }
}
