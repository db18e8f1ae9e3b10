//! CLI for maze solving

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use spanning_mazes::{Maze, MetricsObserver, MetricsRecorder, SolveOutcome, SolverKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Find a way from the entrance to the exit of a maze
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Search strategy: `dfs` or `astar`
    #[arg(short, long, default_value = "astar")]
    solver: SolverKind,

    /// Where to write the annotated maze [default: solution_<solver>.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Give up after expanding this many squares
    #[arg(long)]
    step_budget: Option<usize>,

    /// Print the annotated maze on the terminal
    #[arg(short, long)]
    print: bool,

    /// Print solver metrics
    #[arg(short, long)]
    metrics: bool,

    /// File, where to read the maze. Use `-` for stdin.
    file: PathBuf,
}

/// Read maze from file, write the annotated solution
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let text = if args.file.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.file)
            .with_context(|| format!("Could not read maze from {}", args.file.display()))?
    };
    let mut maze = Maze::parse(text.trim())?;
    if let Some(budget) = args.step_budget {
        maze = maze.with_step_budget(budget);
    }

    let mut recorder = MetricsRecorder::new();
    let outcome = maze.solve_observed(args.solver, &mut recorder)?;

    let solution = match outcome {
        SolveOutcome::Solved(solution) => solution,
        SolveOutcome::NoPathFound => {
            recorder.finished("");
            println!("No path found from the entrance to the exit.");
            if args.metrics {
                recorder.print_report();
            }
            return Ok(());
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("solution_{}.txt", args.solver)));
    fs::write(&output, format!("{}\n", solution.annotated))
        .with_context(|| format!("Could not write solution to {}", output.display()))?;
    recorder.finished(&output.display().to_string());
    info!(output = %output.display(), "solution written");

    if args.print {
        println!("{}", solution.annotated);
    }
    solution.print_report();
    if args.metrics {
        recorder.print_report();
    }
    Ok(())
}
