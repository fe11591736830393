//! Runtime behavior tests.
//!
//! Tests the full stack: compile → Vm::run against a WorldSlot.
//! The published world and the recorded actions are inspected afterwards.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use karel_lang::{
    compile, execute, Direction, FaultKind, FloorPlanBuilder, Outcome, Primitive, Recorder,
    RunControl, Vm, World, WorldSlot,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn run_on(src: &str, world: World) -> (Outcome, World, Recorder) {
    let exe = compile(src).unwrap_or_else(|d| panic!("compile failed: {d}"));
    let slot = WorldSlot::new(world);
    let mut rec = Recorder::new();
    let outcome = execute(&exe, &slot, &mut rec, "test");
    (outcome, slot.get(), rec)
}

fn ok(src: &str, world: World) -> World {
    let (outcome, end, _) = run_on(src, world);
    assert_eq!(outcome, Outcome::Completed, "program did not complete:\n{src}");
    end
}

fn fault(src: &str, world: World) -> (karel_lang::Fault, World) {
    let (outcome, end, _) = run_on(src, world);
    match outcome {
        Outcome::Fault(f) => (f, end),
        other => panic!("expected a fault, got {other}"),
    }
}

fn main_of(actions: &[Primitive]) -> String {
    let body: String = actions.iter().map(|a| format!("{a}(); ")).collect();
    format!("void main() {{ {body}}}")
}

fn wait_until(what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn two_moves_east() {
    let end = ok("void main() { moveForward(); moveForward(); }", World::empty());
    assert_eq!((end.x(), end.y(), end.direction()), (2, 9, Direction::East));
}

#[test]
fn pick_beeper_underfoot() {
    let start = World::empty().drop_beeper(0, 9);
    let end = ok("void main() { if (onBeeper()) { pickBeeper(); } }", start);
    assert_eq!(end.count_beepers(), 0);
}

#[test]
fn wall_ahead_blocks_and_world_is_unchanged() {
    let mut plan = FloorPlanBuilder::new();
    plan.build_vertical_wall(1, 9);
    let start = plan.world();

    let (f, end) = fault("void main() { moveForward(); }", start);
    assert!(matches!(f.kind, FaultKind::Blocked { x: 0, y: 9, direction: Direction::East }));
    assert!(f.to_string().contains("wall"));
    assert_eq!(end, start);
}

#[test]
fn follow_wall_to_corner() {
    let src = "
        void main() {
            while (frontIsClear()) {
                moveForward();
            }
            turnLeft();
            while (frontIsClear()) {
                moveForward();
            }
        }
    ";
    let end = ok(src, World::empty());
    assert_eq!((end.x(), end.y(), end.direction()), (9, 0, Direction::North));
}

#[test]
fn collect_every_beeper_in_row() {
    let src = "
        void main() {
            collect();
            while (frontIsClear()) {
                moveForward();
                collect();
            }
        }
        void collect() {
            if (onBeeper()) {
                pickBeeper();
            }
        }
    ";
    let start = World::empty().drop_beeper(2, 9).drop_beeper(5, 9).drop_beeper(9, 9).drop_beeper(4, 4);
    let end = ok(src, start);
    assert_eq!(end.count_beepers(), 1);
    assert!(end.beeper_at(4, 4));
}

#[test]
fn else_if_chain_picks_first_true_branch() {
    let src = "
        void main() {
            if (onBeeper()) {
                pickBeeper();
            } else if (!frontIsClear() || leftIsClear()) {
                turnLeft();
            } else {
                turnAround();
            }
        }
    ";
    assert_eq!(ok(src, World::empty()).direction(), Direction::North);
    let facing_wall = World::empty().with_karel_at(9, 5, Direction::East);
    assert_eq!(ok(src, facing_wall).direction(), Direction::North);
}

#[test]
fn named_entry_command_runs() {
    let exe = karel_lang::compile_entry("void a() { moveForward(); } void b() { turnLeft(); }", "b")
        .expect("compiles");
    let slot = WorldSlot::default();
    assert!(execute(&exe, &slot, &mut (), "entry").is_completed());
    assert_eq!(slot.get().direction(), Direction::North);
    assert_eq!(slot.get().x(), 0);
}

// ─── Faults ──────────────────────────────────────────────────────────────────

#[test]
fn pick_from_empty_cell_is_fault() {
    let (f, end) = fault("void main() {\n  pickBeeper();\n}", World::empty());
    assert_eq!(f.line, 2);
    assert_eq!(f.kind, FaultKind::NoBeeper { x: 0, y: 9 });
    assert_eq!(end, World::empty());
}

#[test]
fn drop_onto_beeper_is_fault() {
    let (f, _) = fault("void main() { dropBeeper(); dropBeeper(); }", World::empty());
    assert_eq!(f.kind, FaultKind::BeeperPresent { x: 0, y: 9 });
}

#[test]
fn deep_recursion_is_fault() {
    let (f, _) = fault("void main() { spin(); } void spin() { turnLeft(); spin(); }", World::empty());
    assert!(matches!(f.kind, FaultKind::CallDepthExceeded { ref command, depth: 100 } if command == "spin"));
}

#[test]
fn step_budget_counts_nodes_and_queries() {
    let exe = compile("void main() { repeat (3) { turnLeft(); } }").expect("compiles");
    // repeat + three actions
    let slot = WorldSlot::default();
    assert!(Vm::new(&exe).with_step_budget(4).run(&slot, &mut (), "fits").is_completed());

    let slot = WorldSlot::default();
    let outcome = Vm::new(&exe).with_step_budget(3).run(&slot, &mut (), "short");
    assert_eq!(outcome.fault().map(|f| &f.kind), Some(&FaultKind::StepBudgetExceeded { budget: 3 }));
    assert_eq!(slot.get().direction(), Direction::West);
}

// ─── Properties ──────────────────────────────────────────────────────────────

/// Deterministic pseudo-random primitive sequences that never fault.
fn valid_sequence(seed: u64, len: usize, start: World) -> (Vec<Primitive>, World) {
    let mut state = seed;
    let mut world = start;
    let mut actions = Vec::new();
    while actions.len() < len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let primitive = Primitive::ALL[(state >> 33) as usize % Primitive::ALL.len()];
        if primitive.check(&world).is_ok() {
            world = primitive.apply(&world);
            actions.push(primitive);
        }
    }
    (actions, world)
}

#[test]
fn primitive_program_matches_direct_application() {
    let mut plan = FloorPlanBuilder::new();
    plan.build_horizontal_wall(3, 5).build_vertical_wall(6, 2).build_vertical_wall(2, 8);
    let start = plan.world().with_beepers(0x0f0f_0000_0000_1234, 0x5);

    for seed in 1..=20 {
        let (actions, expected) = valid_sequence(seed, 60, start);
        let (outcome, end, rec) = run_on(&main_of(&actions), start);
        assert_eq!(outcome, Outcome::Completed, "seed {seed}");
        assert_eq!(end, expected, "seed {seed}");
        assert_eq!(rec.actions, actions, "seed {seed}");
    }
}

#[test]
fn repeat_equals_unrolled_body() {
    let body = [Primitive::MoveForward, Primitive::TurnLeft, Primitive::DropBeeper, Primitive::PickBeeper];
    for n in [2usize, 3, 7, 12] {
        let looped = format!(
            "void main() {{ repeat ({n}) {{ {}}} }}",
            body.iter().map(|a| format!("{a}(); ")).collect::<String>(),
        );
        let unrolled: Vec<Primitive> = body.iter().copied().cycle().take(body.len() * n).collect();

        let (a, end_a, rec_a) = run_on(&looped, World::empty());
        let (b, end_b, rec_b) = run_on(&main_of(&unrolled), World::empty());
        assert_eq!(a, b, "n = {n}");
        assert_eq!(end_a, end_b, "n = {n}");
        assert_eq!(rec_a.actions, rec_b.actions, "n = {n}");
    }
}

#[test]
fn move_turn_around_move_round_trip() {
    let beepers = World::empty().with_beepers(0xdead_beef, 0x1_0000);
    for direction in Direction::ALL {
        let w = beepers.with_karel_at(4, 4, direction);
        let back = w.move_forward().turn_around().move_forward();
        assert_eq!((back.x(), back.y()), (w.x(), w.y()));
        assert_eq!(back.direction(), direction.opposite());
        assert_eq!(back.beepers(), w.beepers());
        assert_eq!(back.floor_plan(), w.floor_plan());

        let vm_back = ok("void main() { moveForward(); turnAround(); moveForward(); }", w);
        assert_eq!(vm_back, back);
    }
}

#[test]
fn model_drop_is_idempotent() {
    let once = World::empty().drop_beeper(3, 7);
    assert_eq!(once.drop_beeper(3, 7), once);
    assert_eq!(once.count_beepers(), 1);
}

// ─── Control ─────────────────────────────────────────────────────────────────

#[test]
fn step_then_resume_across_threads() {
    let exe = compile("void main() { repeat (5) { turnLeft(); } }").expect("compiles");
    let slot = Arc::new(WorldSlot::default());
    let control = Arc::new(RunControl::new());
    control.pause();

    let vm_thread = {
        let (slot, control) = (Arc::clone(&slot), Arc::clone(&control));
        thread::spawn(move || {
            let mut rec = Recorder::new();
            let outcome = Vm::new(&exe).with_control(control).run(&slot, &mut rec, "stepper");
            (outcome, rec)
        })
    };

    thread::sleep(Duration::from_millis(20));
    assert_eq!(slot.get().direction(), Direction::East);

    control.step();
    wait_until("first step", || slot.get().direction() == Direction::North);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(slot.get().direction(), Direction::North);

    control.step();
    wait_until("second step", || slot.get().direction() == Direction::West);

    control.resume();
    let (outcome, rec) = vm_thread.join().expect("vm thread");
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(rec.actions.len(), 5);
    assert_eq!(slot.get().direction(), Direction::North);
}

#[test]
fn cancel_stops_action_free_loop() {
    let exe = compile("void main() { while (frontIsClear()) { } }").expect("compiles");
    let slot = Arc::new(WorldSlot::default());
    let control = Arc::new(RunControl::new());

    let vm_thread = {
        let (slot, control) = (Arc::clone(&slot), Arc::clone(&control));
        thread::spawn(move || {
            Vm::new(&exe).with_control(control).with_step_budget(u64::MAX).run(&slot, &mut (), "spin")
        })
    };

    thread::sleep(Duration::from_millis(20));
    control.cancel();
    assert_eq!(vm_thread.join().expect("vm thread"), Outcome::Cancelled);
}

#[test]
fn cancel_wakes_paused_run() {
    let exe = compile("void main() { moveForward(); }").expect("compiles");
    let slot = Arc::new(WorldSlot::default());
    let control = Arc::new(RunControl::new());
    control.pause();

    let vm_thread = {
        let (slot, control) = (Arc::clone(&slot), Arc::clone(&control));
        thread::spawn(move || {
            let mut rec = Recorder::new();
            let outcome = Vm::new(&exe).with_control(control).run(&slot, &mut rec, "paused");
            (outcome, rec)
        })
    };

    thread::sleep(Duration::from_millis(20));
    control.cancel();
    let (outcome, rec) = vm_thread.join().expect("vm thread");
    assert_eq!(outcome, Outcome::Cancelled);
    assert!(rec.actions.is_empty());
    assert_eq!(rec.outcome, Some(Outcome::Cancelled));
    assert_eq!(slot.get(), World::default());
}
