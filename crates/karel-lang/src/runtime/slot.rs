//! The published world. The VM is the only writer; any number of readers
//! (an animator, a test, a UI thread) load whole snapshots without locking.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::world::World;

pub struct WorldSlot {
    current: ArcSwap<World>,
}

impl WorldSlot {
    pub fn new(world: World) -> Self {
        Self { current: ArcSwap::from_pointee(world) }
    }

    /// Shared handle to the latest snapshot. Two loads return the same `Arc`
    /// until the next publish, so `Arc::ptr_eq` tells a reader whether
    /// anything changed.
    pub fn load(&self) -> Arc<World> {
        self.current.load_full()
    }

    pub fn get(&self) -> World {
        **self.current.load()
    }

    pub fn publish(&self, world: World) {
        self.current.store(Arc::new(world));
    }
}

impl Default for WorldSlot {
    fn default() -> Self {
        Self::new(World::default())
    }
}

impl std::fmt::Debug for WorldSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldSlot").field("current", &self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_replaces_snapshot() {
        let slot = WorldSlot::default();
        let before = slot.load();
        slot.publish(before.turn_left());
        assert_eq!(slot.get(), before.turn_left());
        assert_eq!(*before, World::default());
    }

    #[test]
    fn unchanged_slot_hands_out_same_arc() {
        let slot = WorldSlot::new(World::empty());
        assert!(Arc::ptr_eq(&slot.load(), &slot.load()));
        let seen = slot.load();
        slot.publish(World::empty());
        assert!(!Arc::ptr_eq(&seen, &slot.load()));
    }

    #[test]
    fn readers_on_other_threads_see_published_worlds() {
        let slot = Arc::new(WorldSlot::default());
        let world = slot.get().move_forward();
        slot.publish(world);
        let reader = Arc::clone(&slot);
        let seen = std::thread::spawn(move || reader.get()).join().expect("reader thread");
        assert_eq!(seen.x(), 1);
    }
}
