//! Pause / single-step / resume / cancel for a running VM.
//!
//! The controlling thread flips flags; the VM calls `checkpoint` after every
//! action and blocks there while paused. When not paused the checkpoint is
//! two atomic loads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Returned by `checkpoint` once `cancel` has been requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

#[derive(Debug, Default)]
pub struct RunControl {
    cancelled: AtomicBool,
    paused: AtomicBool,
    /// Actions the VM may still perform while paused.
    permits: Mutex<u32>,
    wake: Condvar,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        let _permits = self.lock();
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        let mut permits = self.lock();
        *permits = 0;
        self.paused.store(false, Ordering::SeqCst);
        self.wake.notify_all();
    }

    /// Lets exactly one more action through, then holds the VM paused.
    pub fn step(&self) {
        let mut permits = self.lock();
        *permits += 1;
        self.paused.store(true, Ordering::SeqCst);
        self.wake.notify_all();
    }

    pub fn cancel(&self) {
        let _permits = self.lock();
        self.cancelled.store(true, Ordering::SeqCst);
        self.wake.notify_all();
    }

    /// Clears every flag so the control can drive another run.
    pub fn reset(&self) {
        let mut permits = self.lock();
        *permits = 0;
        self.paused.store(false, Ordering::SeqCst);
        self.cancelled.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        if !self.is_paused() {
            return Ok(());
        }

        let mut permits = self.lock();
        loop {
            if self.is_cancelled() {
                return Err(Cancelled);
            }
            if !self.is_paused() {
                return Ok(());
            }
            if *permits > 0 {
                *permits -= 1;
                return Ok(());
            }
            permits = self.wake.wait(permits).unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn lock(&self) -> MutexGuard<'_, u32> {
        self.permits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
