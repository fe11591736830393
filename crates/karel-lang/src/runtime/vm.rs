//! Executes a compiled program against the world in a `WorldSlot`.
//!
//! Every successful action publishes a fresh world snapshot, notifies the
//! observer and then passes a control checkpoint, so pausing or cancelling
//! always lands between two actions.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::builtins::Primitive;
use crate::error::{Fault, FaultKind};
use crate::syntax::ast::Condition;
use super::control::{Cancelled, RunControl};
use super::observer::Observer;
use super::program::{CommandId, Executable, Node};
use super::slot::WorldSlot;

pub const DEFAULT_STEP_BUDGET: u64 = 10_000_000;
pub const DEFAULT_MAX_DEPTH: usize = 100;

// ─── Outcome ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Fault(Fault),
    Cancelled,
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Outcome::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Completed    => write!(f, "completed"),
            Outcome::Fault(fault) => write!(f, "{fault}"),
            Outcome::Cancelled    => write!(f, "cancelled"),
        }
    }
}

enum Stop {
    Fault(Fault),
    Cancelled,
}

impl From<Fault> for Stop {
    fn from(fault: Fault) -> Self {
        Stop::Fault(fault)
    }
}

impl From<Cancelled> for Stop {
    fn from(_: Cancelled) -> Self {
        Stop::Cancelled
    }
}

// ─── Vm ──────────────────────────────────────────────────────────────────────

pub struct Vm<'p> {
    program: &'p Executable,
    control: Arc<RunControl>,
    step_budget: u64,
    max_depth: usize,
}

impl<'p> Vm<'p> {
    pub fn new(program: &'p Executable) -> Self {
        Self {
            program,
            control: Arc::new(RunControl::new()),
            step_budget: DEFAULT_STEP_BUDGET,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_control(mut self, control: Arc<RunControl>) -> Self {
        self.control = control;
        self
    }

    /// Statements plus condition queries allowed before the run faults.
    pub fn with_step_budget(mut self, budget: u64) -> Self {
        self.step_budget = budget;
        self
    }

    /// Nesting of command calls, the entry command included.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Runs the entry command to completion, fault or cancellation. `label`
    /// only names the run in log output.
    pub fn run<O: Observer + ?Sized>(&self, slot: &WorldSlot, observer: &mut O, label: &str) -> Outcome {
        let entry = self.program.entry_command();
        info!("run `{label}`: starting at {}()", entry.name);

        let result = {
            let mut run = Run {
                program: self.program,
                control: &self.control,
                slot,
                observer: &mut *observer,
                step_budget: self.step_budget,
                max_depth: self.max_depth,
                steps: 0,
                depth: 0,
                frames: Vec::new(),
            };
            let result = run.start();
            debug!("run `{label}`: {} step(s)", run.steps);
            result
        };

        let outcome = match result {
            Ok(()) => Outcome::Completed,
            Err(Stop::Fault(fault)) => {
                warn!("run `{label}`: {fault}");
                Outcome::Fault(fault)
            }
            Err(Stop::Cancelled) => Outcome::Cancelled,
        };
        info!("run `{label}`: {outcome}");
        observer.on_finish(&outcome);
        outcome
    }
}

/// Runs `program` with default limits and a private control.
pub fn execute<O: Observer + ?Sized>(program: &Executable, slot: &WorldSlot, observer: &mut O, label: &str) -> Outcome {
    Vm::new(program).run(slot, observer, label)
}

// ─── Run state ───────────────────────────────────────────────────────────────

/// Blocks, loops and calls waiting to resume. Kept on the heap, never on the
/// native stack.
enum Frame<'a> {
    /// `call` marks a command body; finishing it returns from that call.
    Block { nodes: &'a [Node], next: usize, call: bool },
    Repeat { body: &'a [Node], left: u16 },
    While { condition: &'a Condition, body: &'a [Node], line: usize },
}

struct Run<'a, O: ?Sized> {
    program: &'a Executable,
    control: &'a RunControl,
    slot: &'a WorldSlot,
    observer: &'a mut O,
    step_budget: u64,
    max_depth: usize,
    steps: u64,
    depth: usize,
    frames: Vec<Frame<'a>>,
}

impl<'a, O: Observer + ?Sized> Run<'a, O> {
    fn start(&mut self) -> Result<(), Stop> {
        self.control.checkpoint()?;
        let program = self.program;
        let entry = program.entry();
        self.call(entry, program.command(entry).line)?;

        while let Some(frame) = self.frames.pop() {
            match frame {
                Frame::Block { nodes, next, call } => match nodes.get(next) {
                    Some(node) => {
                        self.frames.push(Frame::Block { nodes, next: next + 1, call });
                        self.node(node)?;
                    }
                    None if call => self.depth -= 1,
                    None => {}
                },
                Frame::Repeat { body, left } => {
                    if left > 0 {
                        self.frames.push(Frame::Repeat { body, left: left - 1 });
                        self.enter(body);
                    }
                }
                Frame::While { condition, body, line } => {
                    if self.test(condition, line)? {
                        self.frames.push(Frame::While { condition, body, line });
                        self.enter(body);
                    }
                }
            }
        }
        Ok(())
    }

    fn call(&mut self, target: CommandId, line: usize) -> Result<(), Stop> {
        let program = self.program;
        let command = program.command(target);
        if self.depth >= self.max_depth {
            return Err(Fault::new(line, FaultKind::CallDepthExceeded {
                command: command.name.clone(),
                depth: self.max_depth,
            }).into());
        }
        self.depth += 1;
        self.frames.push(Frame::Block { nodes: &command.body, next: 0, call: true });
        Ok(())
    }

    fn enter(&mut self, nodes: &'a [Node]) {
        if !nodes.is_empty() {
            self.frames.push(Frame::Block { nodes, next: 0, call: false });
        }
    }

    fn node(&mut self, node: &'a Node) -> Result<(), Stop> {
        self.tick(node.line())?;
        match node {
            Node::Action { primitive, line } => self.act(*primitive, *line)?,

            Node::Call { target, line } => self.call(*target, *line)?,

            Node::Repeat { count, body, .. } => {
                self.frames.push(Frame::Repeat { body, left: *count });
            }

            Node::If { condition, then_block, else_block, line } => {
                if self.test(condition, *line)? {
                    self.enter(then_block);
                } else {
                    self.enter(else_block);
                }
            }

            Node::While { condition, body, line } => {
                self.frames.push(Frame::While { condition, body, line: *line });
            }
        }
        Ok(())
    }

    /// Counts one step; also where a cancel reaches loops that perform no action.
    fn tick(&mut self, line: usize) -> Result<(), Stop> {
        if self.control.is_cancelled() {
            return Err(Stop::Cancelled);
        }
        self.steps += 1;
        if self.steps > self.step_budget {
            return Err(Fault::new(line, FaultKind::StepBudgetExceeded { budget: self.step_budget }).into());
        }
        Ok(())
    }

    fn test(&mut self, condition: &Condition, line: usize) -> Result<bool, Stop> {
        Ok(match condition {
            Condition::Query(query, _) => {
                self.tick(line)?;
                query.evaluate(&self.slot.get())
            }
            Condition::Not(inner) => !self.test(inner, line)?,
            Condition::And(a, b) => self.test(a, line)? && self.test(b, line)?,
            Condition::Or(a, b) => self.test(a, line)? || self.test(b, line)?,
        })
    }

    fn act(&mut self, primitive: Primitive, line: usize) -> Result<(), Stop> {
        let world = self.slot.get();
        primitive.check(&world).map_err(|kind| Fault::new(line, kind))?;

        let next = primitive.apply(&world);
        self.slot.publish(next);
        debug!("line {line}: {primitive} -> ({}, {}) {}", next.x(), next.y(), next.direction());

        self.observer.on_action(primitive, &next);
        self.control.checkpoint()?;
        Ok(())
    }
}
