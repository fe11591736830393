use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use karel_lang::{Direction, World, DEFAULT_MAX_DEPTH, DEFAULT_STEP_BUDGET};

#[derive(Parser, Debug)]
#[command(author, version, about = "Compile and run Karel programs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and compile a program without running it.
    Check {
        file: PathBuf,
        /// Command to start from instead of the first one.
        #[arg(long)]
        entry: Option<String>,
    },
    /// Run a program and animate the world in the terminal.
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    pub file: PathBuf,

    /// Command to start from instead of the first one.
    #[arg(long)]
    pub entry: Option<String>,

    /// Starting pose as X,Y,DIR, e.g. `0,9,east`.
    #[arg(long, value_parser = parse_pose)]
    pub at: Option<Pose>,

    /// Flips the beeper at X,Y, so with `--fill` it clears that cell. Repeatable.
    #[arg(long = "beeper", value_parser = parse_cell)]
    pub beepers: Vec<(u8, u8)>,

    /// Start with a beeper on every cell.
    #[arg(long)]
    pub fill: bool,

    /// Pause after each action, in milliseconds.
    #[arg(long, default_value_t = 200)]
    pub delay: u64,

    #[arg(long, default_value_t = DEFAULT_STEP_BUDGET)]
    pub steps: u64,

    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub depth: usize,

    /// Print only the final world.
    #[arg(long)]
    pub quiet: bool,
}

impl RunArgs {
    pub fn initial_world(&self) -> World {
        let mut world = World::empty();
        if self.fill {
            world = world.fill_with_beepers();
        }
        for &(x, y) in &self.beepers {
            world = world.toggle_beeper(x, y);
        }
        if let Some(pose) = self.at {
            world = world.with_karel_at(pose.x, pose.y, pose.direction);
        }
        world
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pose {
    pub x: u8,
    pub y: u8,
    pub direction: Direction,
}

fn coordinate(text: &str, axis: &str) -> Result<u8, String> {
    match text.trim().parse::<u8>() {
        Ok(v) if v < 10 => Ok(v),
        _ => Err(format!("{axis} must be a number from 0 to 9, got `{text}`")),
    }
}

fn parse_cell(text: &str) -> Result<(u8, u8), String> {
    let (x, y) = text.split_once(',').ok_or_else(|| format!("expected X,Y, got `{text}`"))?;
    Ok((coordinate(x, "x")?, coordinate(y, "y")?))
}

fn parse_pose(text: &str) -> Result<Pose, String> {
    let mut parts = text.splitn(3, ',');
    let (Some(x), Some(y), Some(direction)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected X,Y,DIR, got `{text}`"));
    };
    Ok(Pose {
        x: coordinate(x, "x")?,
        y: coordinate(y, "y")?,
        direction: direction.trim().parse().map_err(|e| format!("{e}"))?,
    })
}
