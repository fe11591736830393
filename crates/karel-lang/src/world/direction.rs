use std::str::FromStr;

/// Compass direction. The discriminant order makes a left turn `+1 mod 4`
/// and turning around `+2 mod 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    East = 0,
    North = 1,
    West = 2,
    South = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::East, Self::North, Self::West, Self::South];

    /// Any integer maps onto a direction, negative values included.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// `quarter_turns` counter-clockwise; negative values turn clockwise.
    pub fn turn(self, quarter_turns: i32) -> Self {
        Self::from_index(self as i32 + quarter_turns.rem_euclid(4))
    }

    pub fn left(self) -> Self { self.turn(1) }
    pub fn opposite(self) -> Self { self.turn(2) }
    pub fn right(self) -> Self { self.turn(3) }

    /// Grid offset of one step. Rows grow southwards.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Self::East  => (1, 0),
            Self::North => (0, -1),
            Self::West  => (-1, 0),
            Self::South => (0, 1),
        }
    }

    /// The bit this direction occupies in a cell's wall mask.
    pub fn wall_bit(self) -> u8 {
        1 << self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::East  => "east",
            Self::North => "north",
            Self::West  => "west",
            Self::South => "south",
        }
    }

    /// Single character used by the ASCII renderer.
    pub fn glyph(self) -> char {
        match self {
            Self::East  => '>',
            Self::North => '^',
            Self::West  => '<',
            Self::South => 'v',
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction `{0}`, expected east, north, west or south")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "east" | "e"  => Ok(Self::East),
            "north" | "n" => Ok(Self::North),
            "west" | "w"  => Ok(Self::West),
            "south" | "s" => Ok(Self::South),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}
