//! Wall layout of the grid.
//!
//! Every cell carries a 4-bit mask, one bit per compass direction. A wall
//! between two neighbouring cells is stored on both of them, so
//! `walls_at` answers for a single cell without looking at its neighbours.

use super::{Direction, World, HEIGHT, WIDTH};

pub const WALL_NONE: u8 = 0;
pub const WALL_EAST: u8 = 1;
pub const WALL_NORTH: u8 = 2;
pub const WALL_WEST: u8 = 4;
pub const WALL_SOUTH: u8 = 8;

const CELLS: usize = (WIDTH as usize) * (HEIGHT as usize);

fn index(x: u8, y: u8) -> usize {
    y as usize * WIDTH as usize + x as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloorPlan {
    walls: [u8; CELLS],
}

impl FloorPlan {
    /// Walls around the outer border and nowhere else.
    pub fn empty() -> Self {
        let mut walls = [WALL_NONE; CELLS];
        for x in 0..WIDTH {
            walls[index(x, 0)] |= WALL_NORTH;
            walls[index(x, HEIGHT - 1)] |= WALL_SOUTH;
        }
        for y in 0..HEIGHT {
            walls[index(0, y)] |= WALL_WEST;
            walls[index(WIDTH - 1, y)] |= WALL_EAST;
        }
        Self { walls }
    }

    pub fn walls_at(&self, x: u8, y: u8) -> u8 {
        assert!(x < WIDTH && y < HEIGHT, "cell ({x}, {y}) is outside the grid");
        self.walls[index(x, y)]
    }

    pub fn has_wall(&self, x: u8, y: u8, direction: Direction) -> bool {
        self.walls_at(x, y) & direction.wall_bit() != 0
    }

    /// Staging copy of this plan for further construction.
    pub fn builder(&self) -> FloorPlanBuilder {
        FloorPlanBuilder { walls: self.walls }
    }

    pub fn world(self) -> World {
        World::new(self)
    }
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self::empty()
    }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Mutable staging area for a starting layout. Consumed by `build`/`world`.
#[derive(Debug, Clone)]
pub struct FloorPlanBuilder {
    walls: [u8; CELLS],
}

impl FloorPlanBuilder {
    pub fn new() -> Self {
        FloorPlan::empty().builder()
    }

    /// Wall along the north edge of `(x, y)`. `y == HEIGHT` means the south
    /// edge of the bottom row.
    pub fn build_horizontal_wall(&mut self, x: u8, y: u8) -> &mut Self {
        assert!(x < WIDTH && y <= HEIGHT, "horizontal wall ({x}, {y}) is outside the grid");
        if y < HEIGHT {
            self.walls[index(x, y)] |= WALL_NORTH;
        }
        if y > 0 {
            self.walls[index(x, y - 1)] |= WALL_SOUTH;
        }
        self
    }

    /// Wall along the west edge of `(x, y)`. `x == WIDTH` means the east edge
    /// of the rightmost column.
    pub fn build_vertical_wall(&mut self, x: u8, y: u8) -> &mut Self {
        assert!(x <= WIDTH && y < HEIGHT, "vertical wall ({x}, {y}) is outside the grid");
        if x < WIDTH {
            self.walls[index(x, y)] |= WALL_WEST;
        }
        if x > 0 {
            self.walls[index(x - 1, y)] |= WALL_EAST;
        }
        self
    }

    /// Removes the wall on the `direction` side of `(x, y)`, on both cells.
    pub fn tear_down_wall(&mut self, x: u8, y: u8, direction: Direction) -> &mut Self {
        assert!(x < WIDTH && y < HEIGHT, "cell ({x}, {y}) is outside the grid");
        self.walls[index(x, y)] &= !direction.wall_bit();
        if let Some((nx, ny)) = super::neighbour(x, y, direction) {
            self.walls[index(nx, ny)] &= !direction.opposite().wall_bit();
        }
        self
    }

    pub fn build(self) -> FloorPlan {
        FloorPlan { walls: self.walls }
    }

    pub fn world(self) -> World {
        self.build().world()
    }
}

impl Default for FloorPlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}
