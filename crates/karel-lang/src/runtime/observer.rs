use crate::builtins::Primitive;
use crate::world::World;
use super::vm::Outcome;

/// Hooks the VM calls from the executing thread. Both default to no-ops.
pub trait Observer {
    /// Called after `action` succeeded and `world` was published.
    fn on_action(&mut self, action: Primitive, world: &World) {
        let _ = (action, world);
    }

    fn on_finish(&mut self, outcome: &Outcome) {
        let _ = outcome;
    }
}

impl Observer for () {}

/// Keeps every action and the world it produced, in order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub actions: Vec<Primitive>,
    pub worlds: Vec<World>,
    pub outcome: Option<Outcome>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_world(&self) -> Option<&World> {
        self.worlds.last()
    }
}

impl Observer for Recorder {
    fn on_action(&mut self, action: Primitive, world: &World) {
        self.actions.push(action);
        self.worlds.push(*world);
    }

    fn on_finish(&mut self, outcome: &Outcome) {
        self.outcome = Some(outcome.clone());
    }
}
