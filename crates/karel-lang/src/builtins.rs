//! Built-in vocabulary: the primitive actions Karel can perform and the
//! conditions it can sense. Neither needs to be declared by the learner.

use crate::error::FaultKind;
use crate::world::World;

// ─── Primitive actions ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    MoveForward,
    TurnLeft,
    TurnRight,
    TurnAround,
    PickBeeper,
    DropBeeper,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Self::MoveForward, Self::TurnLeft, Self::TurnRight,
        Self::TurnAround, Self::PickBeeper, Self::DropBeeper,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MoveForward => "moveForward",
            Self::TurnLeft    => "turnLeft",
            Self::TurnRight   => "turnRight",
            Self::TurnAround  => "turnAround",
            Self::PickBeeper  => "pickBeeper",
            Self::DropBeeper  => "dropBeeper",
        }
    }

    /// The condition a learner most likely meant when writing this action
    /// where a condition was expected.
    pub fn related_query(self) -> Query {
        match self {
            Self::MoveForward | Self::TurnAround => Query::FrontIsClear,
            Self::TurnLeft                       => Query::LeftIsClear,
            Self::TurnRight                      => Query::RightIsClear,
            Self::PickBeeper | Self::DropBeeper  => Query::OnBeeper,
        }
    }

    /// Precondition against the current world.
    pub fn check(self, world: &World) -> Result<(), FaultKind> {
        let (x, y) = (world.x(), world.y());
        match self {
            Self::MoveForward if !world.front_is_clear() => {
                Err(FaultKind::Blocked { x, y, direction: world.direction() })
            }
            Self::PickBeeper if !world.on_beeper() => Err(FaultKind::NoBeeper { x, y }),
            Self::DropBeeper if world.on_beeper() => Err(FaultKind::BeeperPresent { x, y }),
            _ => Ok(()),
        }
    }

    /// The world after performing this action. Does not check preconditions.
    pub fn apply(self, world: &World) -> World {
        match self {
            Self::MoveForward => world.move_forward(),
            Self::TurnLeft    => world.turn_left(),
            Self::TurnRight   => world.turn_right(),
            Self::TurnAround  => world.turn_around(),
            Self::PickBeeper  => world.pick_beeper(),
            Self::DropBeeper  => world.drop_beeper(world.x(), world.y()),
        }
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Conditions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    FrontIsClear,
    LeftIsClear,
    RightIsClear,
    OnBeeper,
    BeeperAhead,
}

impl Query {
    pub const ALL: [Query; 5] = [
        Self::FrontIsClear, Self::LeftIsClear, Self::RightIsClear,
        Self::OnBeeper, Self::BeeperAhead,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FrontIsClear => "frontIsClear",
            Self::LeftIsClear  => "leftIsClear",
            Self::RightIsClear => "rightIsClear",
            Self::OnBeeper     => "onBeeper",
            Self::BeeperAhead  => "beeperAhead",
        }
    }

    pub fn evaluate(self, world: &World) -> bool {
        match self {
            Self::FrontIsClear => world.front_is_clear(),
            Self::LeftIsClear  => world.left_is_clear(),
            Self::RightIsClear => world.right_is_clear(),
            Self::OnBeeper     => world.on_beeper(),
            Self::BeeperAhead  => world.beeper_ahead(),
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// True for any name the learner may not declare as a command.
pub fn is_builtin(name: &str) -> bool {
    Primitive::from_name(name).is_some() || Query::from_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Direction, FloorPlanBuilder};

    #[test]
    fn names_round_trip() {
        for p in Primitive::ALL {
            assert_eq!(Primitive::from_name(p.name()), Some(p));
        }
        for q in Query::ALL {
            assert_eq!(Query::from_name(q.name()), Some(q));
        }
        assert_eq!(Primitive::from_name("jump"), None);
    }

    #[test]
    fn move_blocked_by_wall() {
        let mut b = FloorPlanBuilder::new();
        b.build_vertical_wall(1, 9);
        let w = b.world();
        assert_eq!(
            Primitive::MoveForward.check(&w),
            Err(FaultKind::Blocked { x: 0, y: 9, direction: Direction::East })
        );
    }

    #[test]
    fn pick_needs_beeper() {
        let w = World::empty();
        assert_eq!(Primitive::PickBeeper.check(&w), Err(FaultKind::NoBeeper { x: 0, y: 9 }));
        let w = w.drop_beeper(0, 9);
        assert_eq!(Primitive::PickBeeper.check(&w), Ok(()));
        assert_eq!(Primitive::PickBeeper.apply(&w).count_beepers(), 0);
    }

    #[test]
    fn drop_needs_empty_cell() {
        let w = World::empty().drop_beeper(0, 9);
        assert_eq!(Primitive::DropBeeper.check(&w), Err(FaultKind::BeeperPresent { x: 0, y: 9 }));
    }

    #[test]
    fn turns_always_succeed() {
        let w = World::empty();
        for p in [Primitive::TurnLeft, Primitive::TurnRight, Primitive::TurnAround] {
            assert_eq!(p.check(&w), Ok(()));
        }
        assert_eq!(Primitive::TurnRight.apply(&w).direction(), Direction::South);
    }

    #[test]
    fn queries_read_world() {
        let w = World::empty().drop_beeper(1, 9);
        assert!(Query::FrontIsClear.evaluate(&w));
        assert!(!Query::RightIsClear.evaluate(&w));
        assert!(Query::BeeperAhead.evaluate(&w));
        assert!(!Query::OnBeeper.evaluate(&w));
    }

    #[test]
    fn builtins_are_reserved() {
        assert!(is_builtin("moveForward"));
        assert!(is_builtin("onBeeper"));
        assert!(!is_builtin("main"));
    }
}
