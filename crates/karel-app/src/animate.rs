//! Terminal animation. The animator polls the world slot from its own thread
//! and redraws whenever a new snapshot has been published.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use karel_lang::{Observer, Primitive, RunControl, World, WorldSlot};

pub struct Animator<'a> {
    slot: &'a WorldSlot,
    interval: Duration,
    shown: Option<Arc<World>>,
    frames: usize,
}

impl<'a> Animator<'a> {
    pub fn new(slot: &'a WorldSlot, interval: Duration) -> Self {
        Self { slot, interval, shown: None, frames: 0 }
    }

    /// Draws the current world if it differs from the last one drawn.
    pub fn poll(&mut self, out: &mut impl Write) -> io::Result<bool> {
        let current = self.slot.load();
        if self.shown.as_ref().is_some_and(|s| Arc::ptr_eq(s, &current)) {
            return Ok(false);
        }
        self.frames += 1;
        // clear screen, cursor home
        write!(out, "\x1b[2J\x1b[H")?;
        writeln!(out, "frame {}", self.frames)?;
        writeln!(out, "{current}")?;
        out.flush()?;
        self.shown = Some(current);
        Ok(true)
    }

    /// Keeps polling until `done` reports true, then draws the final world.
    pub fn run_until(&mut self, out: &mut impl Write, done: impl Fn() -> bool) -> io::Result<()> {
        loop {
            let finished = done();
            self.poll(out)?;
            if finished {
                return Ok(());
            }
            thread::sleep(self.interval);
        }
    }

    /// `run_until` for a live run: if drawing fails, the run is cancelled
    /// before the error is handed back.
    pub fn follow(&mut self, out: &mut impl Write, control: &RunControl, done: impl Fn() -> bool) -> io::Result<()> {
        self.run_until(out, done).inspect_err(|e| {
            log::warn!("drawing failed, cancelling run: {e}");
            control.cancel();
        })
    }
}

/// Slows the VM down so each action stays on screen for `delay`.
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Observer for Pacer {
    fn on_action(&mut self, action: Primitive, world: &World) {
        log::debug!("{action} at ({}, {})", world.x(), world.y());
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}
