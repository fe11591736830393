pub mod control;
pub mod observer;
pub mod program;
pub mod slot;
pub mod vm;

pub use control::RunControl;
pub use observer::{Observer, Recorder};
pub use program::{CommandId, CompiledCommand, Executable, Node};
pub use slot::WorldSlot;
pub use vm::{execute, Outcome, Vm, DEFAULT_MAX_DEPTH, DEFAULT_STEP_BUDGET};
