mod animate;
mod cli;

use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use karel_lang::{compile_entry, Diagnostic, Executable, Outcome, RunControl, Vm, WorldSlot};

use animate::{Animator, Pacer};
use cli::{Cli, Command, RunArgs};

const FRAME_INTERVAL: Duration = Duration::from_millis(15);

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Check { file, entry } => check(&file, entry.as_deref()),
        Command::Run(args) => run_program(&args),
    }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

fn check(file: &Path, entry: Option<&str>) -> anyhow::Result<ExitCode> {
    let source = load(file)?;
    match compile(&source, entry) {
        Ok(program) => {
            println!(
                "{}: ok, {} command(s), entry {}()",
                file.display(),
                program.commands().len(),
                program.entry_command().name,
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(d) => {
            report(file, &source, &d);
            Ok(ExitCode::from(1))
        }
    }
}

fn run_program(args: &RunArgs) -> anyhow::Result<ExitCode> {
    let source = load(&args.file)?;
    let program = match compile(&source, args.entry.as_deref()) {
        Ok(p) => p,
        Err(d) => {
            report(&args.file, &source, &d);
            return Ok(ExitCode::from(1));
        }
    };

    let slot = WorldSlot::new(args.initial_world());
    let label = args.file.display().to_string();
    let delay = if args.quiet { Duration::ZERO } else { Duration::from_millis(args.delay) };
    let control = Arc::new(RunControl::new());

    // VM on its own thread; this thread animates whatever it publishes.
    let outcome = thread::scope(|s| {
        let vm = s.spawn(|| {
            Vm::new(&program)
                .with_control(Arc::clone(&control))
                .with_step_budget(args.steps)
                .with_max_depth(args.depth)
                .run(&slot, &mut Pacer::new(delay), &label)
        });
        if !args.quiet {
            Animator::new(&slot, FRAME_INTERVAL)
                .follow(&mut io::stdout().lock(), &control, || vm.is_finished())
                .context("Drawing world")?;
        }
        vm.join().map_err(|_| anyhow!("VM thread panicked"))
    })?;

    if args.quiet {
        println!("{}", slot.get());
    }

    Ok(match outcome {
        Outcome::Completed => {
            println!("{}: completed", args.file.display());
            ExitCode::SUCCESS
        }
        Outcome::Fault(fault) => {
            eprintln!("{}:{}: runtime error: {}", args.file.display(), fault.line, fault.kind);
            ExitCode::from(2)
        }
        Outcome::Cancelled => {
            eprintln!("{}: cancelled", args.file.display());
            ExitCode::from(130)
        }
    })
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn load(file: &Path) -> anyhow::Result<String> {
    fs::read_to_string(file).with_context(|| format!("Reading {}", file.display()))
}

fn compile(source: &str, entry: Option<&str>) -> Result<Executable, Diagnostic> {
    match entry {
        Some(name) => compile_entry(source, name),
        None => karel_lang::compile(source),
    }
}

/// `file:line:col: error[CODE]: message`, then the offending line and a caret.
fn report(file: &Path, source: &str, d: &Diagnostic) {
    eprintln!("{}:{}:{}: error[{}]: {}", file.display(), d.line, d.column, d.code, d.message);
    if let Some(text) = source.lines().nth(d.line.saturating_sub(1)) {
        let pad: String = text.chars().take(d.column.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        eprintln!("    {text}");
        eprintln!("    {pad}^");
    }
}
