//! Grid world model.
//!
//! A `World` is a small `Copy` value: robot pose, a 100-bit beeper set split
//! over two words, and the floor plan. Every operation returns a new world
//! and leaves the receiver untouched.

pub mod direction;
pub mod floor_plan;

pub use direction::{Direction, ParseDirectionError};
pub use floor_plan::{FloorPlan, FloorPlanBuilder, WALL_EAST, WALL_NONE, WALL_NORTH, WALL_SOUTH, WALL_WEST};

pub const WIDTH: u8 = 10;
pub const HEIGHT: u8 = 10;

/// Cells 64..100 live in the low 36 bits of the high word.
const HI_MASK: u64 = (1 << 36) - 1;

/// The in-grid cell one step from `(x, y)`, if any.
pub(crate) fn neighbour(x: u8, y: u8, direction: Direction) -> Option<(u8, u8)> {
    let (dx, dy) = direction.delta();
    let nx = x as i16 + dx as i16;
    let ny = y as i16 + dy as i16;
    if (0..WIDTH as i16).contains(&nx) && (0..HEIGHT as i16).contains(&ny) {
        Some((nx as u8, ny as u8))
    } else {
        None
    }
}

/// Returns `(in_high_word, mask)` for cell `(x, y)`.
fn beeper_bit(x: u8, y: u8) -> (bool, u64) {
    assert!(x < WIDTH && y < HEIGHT, "cell ({x}, {y}) is outside the grid");
    let index = y as u32 * WIDTH as u32 + x as u32;
    if index < 64 { (false, 1 << index) } else { (true, 1 << (index - 64)) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct World {
    x: u8,
    y: u8,
    direction: Direction,
    beepers_lo: u64,
    beepers_hi: u64,
    floor_plan: FloorPlan,
}

impl World {
    /// Karel starts in the bottom-left corner facing east, no beepers.
    pub fn new(floor_plan: FloorPlan) -> Self {
        Self { x: 0, y: HEIGHT - 1, direction: Direction::East, beepers_lo: 0, beepers_hi: 0, floor_plan }
    }

    pub fn empty() -> Self {
        Self::new(FloorPlan::empty())
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn x(&self) -> u8 { self.x }
    pub fn y(&self) -> u8 { self.y }
    pub fn direction(&self) -> Direction { self.direction }
    pub fn floor_plan(&self) -> &FloorPlan { &self.floor_plan }

    /// The beeper set as `(low_word, high_word)`.
    pub fn beepers(&self) -> (u64, u64) {
        (self.beepers_lo, self.beepers_hi)
    }

    pub fn walls_at(&self, x: u8, y: u8) -> u8 {
        self.floor_plan.walls_at(x, y)
    }

    // ─── Beepers ─────────────────────────────────────────────────────────────

    pub fn beeper_at(&self, x: u8, y: u8) -> bool {
        match beeper_bit(x, y) {
            (false, mask) => self.beepers_lo & mask != 0,
            (true, mask) => self.beepers_hi & mask != 0,
        }
    }

    pub fn on_beeper(&self) -> bool {
        self.beeper_at(self.x, self.y)
    }

    /// Beeper in the cell ahead, walls notwithstanding. False at the grid edge.
    pub fn beeper_ahead(&self) -> bool {
        neighbour(self.x, self.y, self.direction).is_some_and(|(x, y)| self.beeper_at(x, y))
    }

    pub fn count_beepers(&self) -> u32 {
        self.beepers_lo.count_ones() + self.beepers_hi.count_ones()
    }

    /// Idempotent: dropping onto an occupied cell returns an equal world.
    pub fn drop_beeper(&self, x: u8, y: u8) -> Self {
        let mut next = *self;
        match beeper_bit(x, y) {
            (false, mask) => next.beepers_lo |= mask,
            (true, mask) => next.beepers_hi |= mask,
        }
        next
    }

    fn clear_beeper(&self, x: u8, y: u8) -> Self {
        let mut next = *self;
        match beeper_bit(x, y) {
            (false, mask) => next.beepers_lo &= !mask,
            (true, mask) => next.beepers_hi &= !mask,
        }
        next
    }

    /// Removes the beeper under the robot, if there is one.
    pub fn pick_beeper(&self) -> Self {
        self.clear_beeper(self.x, self.y)
    }

    /// Drops a beeper at `(x, y)` if the cell is empty, else picks it up.
    pub fn toggle_beeper(&self, x: u8, y: u8) -> Self {
        if self.beeper_at(x, y) { self.clear_beeper(x, y) } else { self.drop_beeper(x, y) }
    }

    /// Replaces the whole beeper set. Bits beyond cell 99 are discarded.
    pub fn with_beepers(&self, lo: u64, hi: u64) -> Self {
        Self { beepers_lo: lo, beepers_hi: hi & HI_MASK, ..*self }
    }

    pub fn fill_with_beepers(&self) -> Self {
        self.with_beepers(u64::MAX, HI_MASK)
    }

    // ─── Pose ────────────────────────────────────────────────────────────────

    /// One step ahead, ignoring walls. The robot never leaves the grid.
    pub fn move_forward(&self) -> Self {
        match neighbour(self.x, self.y, self.direction) {
            Some((x, y)) => Self { x, y, ..*self },
            None => *self,
        }
    }

    pub fn turn(&self, quarter_turns: i32) -> Self {
        Self { direction: self.direction.turn(quarter_turns), ..*self }
    }

    pub fn turn_left(&self) -> Self { self.turn(1) }
    pub fn turn_around(&self) -> Self { self.turn(2) }
    pub fn turn_right(&self) -> Self { self.turn(3) }

    pub fn with_karel_at(&self, x: u8, y: u8, direction: Direction) -> Self {
        assert!(x < WIDTH && y < HEIGHT, "cell ({x}, {y}) is outside the grid");
        Self { x, y, direction, ..*self }
    }

    // ─── Sensors ─────────────────────────────────────────────────────────────

    fn is_clear(&self, direction: Direction) -> bool {
        !self.floor_plan.has_wall(self.x, self.y, direction)
            && neighbour(self.x, self.y, direction).is_some()
    }

    pub fn front_is_clear(&self) -> bool { self.is_clear(self.direction) }
    pub fn left_is_clear(&self) -> bool { self.is_clear(self.direction.left()) }
    pub fn right_is_clear(&self) -> bool { self.is_clear(self.direction.right()) }
}

impl Default for World {
    fn default() -> Self {
        Self::empty()
    }
}

/// ASCII picture: `+---+` wall segments, `o` beepers, the robot as `> ^ < v`
/// (bracketed when it stands on a beeper).
impl std::fmt::Display for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let top = if self.walls_at(x, y) & WALL_NORTH != 0 { "---" } else { "   " };
                write!(f, "+{top}")?;
            }
            writeln!(f, "+")?;
            for x in 0..WIDTH {
                let left = if self.walls_at(x, y) & WALL_WEST != 0 { '|' } else { ' ' };
                let here = (x, y) == (self.x, self.y);
                let cell = match (here, self.beeper_at(x, y)) {
                    (true, true) => format!("({})", self.direction.glyph()),
                    (true, false) => format!(" {} ", self.direction.glyph()),
                    (false, true) => " o ".to_string(),
                    (false, false) => " . ".to_string(),
                };
                write!(f, "{left}{cell}")?;
            }
            let right = if self.walls_at(WIDTH - 1, y) & WALL_EAST != 0 { '|' } else { ' ' };
            writeln!(f, "{right}")?;
        }
        for x in 0..WIDTH {
            let bottom = if self.walls_at(x, HEIGHT - 1) & WALL_SOUTH != 0 { "---" } else { "   " };
            write!(f, "+{bottom}")?;
        }
        writeln!(f, "+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_home() {
        let w = World::empty();
        assert_eq!((w.x(), w.y(), w.direction()), (0, 9, Direction::East));
        assert_eq!(w.count_beepers(), 0);
    }

    #[test]
    fn drop_is_idempotent() {
        let w = World::empty().drop_beeper(3, 4);
        assert_eq!(w.drop_beeper(3, 4), w);
        assert_eq!(w.count_beepers(), 1);
    }

    #[test]
    fn drop_leaves_source_world_untouched() {
        let w = World::empty();
        let _ = w.drop_beeper(1, 1);
        assert_eq!(w.count_beepers(), 0);
    }

    #[test]
    fn cells_map_onto_both_words() {
        let w = World::empty().drop_beeper(3, 6).drop_beeper(4, 6);
        // cell 63 is the top bit of the low word, cell 64 the bottom of the high word
        assert_eq!(w.beepers(), (1 << 63, 1));
    }

    #[test]
    fn bottom_row_is_high_bits() {
        let w = World::empty().with_beepers(0, 1023 << (90 - 64));
        for x in 0..WIDTH {
            assert!(w.beeper_at(x, 9));
        }
        assert_eq!(w.count_beepers(), 10);
    }

    #[test]
    fn with_beepers_masks_overflow_bits() {
        let w = World::empty().with_beepers(0, u64::MAX);
        assert_eq!(w.count_beepers(), 36);
    }

    #[test]
    fn fill_covers_every_cell() {
        assert_eq!(World::empty().fill_with_beepers().count_beepers(), 100);
    }

    #[test]
    fn pick_removes_only_underfoot() {
        let w = World::empty().drop_beeper(0, 9).drop_beeper(1, 9);
        let picked = w.pick_beeper();
        assert!(!picked.beeper_at(0, 9));
        assert!(picked.beeper_at(1, 9));
    }

    #[test]
    fn toggle_flips() {
        let w = World::empty().toggle_beeper(2, 2);
        assert!(w.beeper_at(2, 2));
        assert!(!w.toggle_beeper(2, 2).beeper_at(2, 2));
    }

    #[test]
    fn move_stays_on_grid() {
        let w = World::empty().with_karel_at(9, 0, Direction::North);
        assert_eq!(w.move_forward(), w);
        assert_eq!(w.turn_right().move_forward(), w.turn_right());
    }

    #[test]
    fn move_north_decrements_row() {
        let w = World::empty().with_karel_at(4, 4, Direction::North).move_forward();
        assert_eq!((w.x(), w.y()), (4, 3));
    }

    #[test]
    fn move_turn_around_move_round_trip() {
        let w = World::empty().with_karel_at(4, 4, Direction::West).drop_beeper(7, 7);
        let back = w.move_forward().turn_around().move_forward();
        assert_eq!((back.x(), back.y()), (w.x(), w.y()));
        assert_eq!(back.beepers(), w.beepers());
        assert_eq!(back.floor_plan(), w.floor_plan());
        assert_eq!(back.direction(), w.direction().opposite());
    }

    #[test]
    fn turn_signed() {
        let w = World::empty();
        assert_eq!(w.turn(-1).direction(), Direction::South);
        assert_eq!(w.turn(5).direction(), Direction::North);
        assert_eq!(w.turn(i32::MAX).direction(), Direction::South);
        assert_eq!(w.turn(i32::MIN).direction(), Direction::East);
    }

    #[test]
    fn sensors_see_walls_and_border() {
        let mut b = FloorPlanBuilder::new();
        b.build_vertical_wall(5, 5);
        let w = b.world().with_karel_at(4, 5, Direction::East);
        assert!(!w.front_is_clear());
        assert!(w.left_is_clear());
        assert!(w.right_is_clear());

        let corner = World::empty();
        assert!(corner.front_is_clear());
        assert!(!corner.right_is_clear());
        assert!(corner.left_is_clear());
    }

    #[test]
    fn beeper_ahead_ignores_walls() {
        let mut b = FloorPlanBuilder::new();
        b.build_vertical_wall(1, 9);
        let w = b.world().drop_beeper(1, 9);
        assert!(w.beeper_ahead());
        assert!(!w.turn_around().beeper_ahead());
    }

    #[test]
    fn display_draws_robot_and_beepers() {
        let w = World::empty().drop_beeper(1, 9).drop_beeper(0, 9);
        let text = w.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 21);
        assert!(lines[19].starts_with("|(>)  o   . "));
        assert!(lines[0].starts_with("+---+---"));
    }
}
