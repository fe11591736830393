//! Executable form of a program, produced once by the compiler and shared
//! read-only by the VM. Command calls are table indices, never names.

use crate::builtins::Primitive;
use crate::syntax::ast::Condition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(pub(crate) usize);

impl CommandId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Action { primitive: Primitive, line: usize },
    Call { target: CommandId, line: usize },
    Repeat { count: u16, body: Vec<Node>, line: usize },
    If { condition: Condition, then_block: Vec<Node>, else_block: Vec<Node>, line: usize },
    While { condition: Condition, body: Vec<Node>, line: usize },
}

impl Node {
    pub fn line(&self) -> usize {
        match self {
            Node::Action { line, .. } => *line,
            Node::Call { line, .. }   => *line,
            Node::Repeat { line, .. } => *line,
            Node::If { line, .. }     => *line,
            Node::While { line, .. }  => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCommand {
    pub name: String,
    pub body: Vec<Node>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Executable {
    entry: CommandId,
    commands: Vec<CompiledCommand>,
}

impl Executable {
    /// `entry` must index into `commands`; the compiler guarantees it.
    pub(crate) fn new(entry: CommandId, commands: Vec<CompiledCommand>) -> Self {
        debug_assert!(entry.0 < commands.len());
        Self { entry, commands }
    }

    pub fn entry(&self) -> CommandId {
        self.entry
    }

    pub fn entry_command(&self) -> &CompiledCommand {
        self.command(self.entry)
    }

    pub fn command(&self, id: CommandId) -> &CompiledCommand {
        &self.commands[id.0]
    }

    pub fn commands(&self) -> &[CompiledCommand] {
        &self.commands
    }

    pub fn find(&self, name: &str) -> Option<CommandId> {
        self.commands.iter().position(|c| c.name == name).map(CommandId)
    }
}
