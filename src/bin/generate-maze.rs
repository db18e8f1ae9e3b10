//! CLI for maze generation

use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::Parser;
use spanning_mazes::{Algorithm, Grid, MazeGenerator, MetricsObserver, MetricsRecorder};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Perfect maze generator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Cells per side; asked interactively when missing
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// `kruskal`, `kruskal_optimized`, `kruskal_weighted` or `backtracker`
    #[arg(short, long, default_value = "kruskal")]
    algorithm: Algorithm,

    /// Output file [default: <output-dir>/<algorithm>_<size>_<seed>.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for derived output file names
    #[arg(long, default_value = "grids")]
    output_dir: PathBuf,

    /// Check the spanning tree before writing
    #[arg(long)]
    verify: bool,

    /// Print the maze on the terminal (up to size 20)
    #[arg(short, long)]
    print: bool,

    /// Print generation metrics
    #[arg(short, long)]
    metrics: bool,
}

fn prompt(question: &str) -> anyhow::Result<String> {
    print!("{}", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Ask for size, and then seed, on the terminal
fn ask_size_and_seed() -> anyhow::Result<(usize, Option<u64>)> {
    let size = prompt("Maze size: ")?;
    let size: usize = size
        .parse()
        .with_context(|| format!("Maze size must be a positive integer, got `{}`", size))?;

    let seed = prompt("Seed (leave empty for random): ")?;
    let seed = if seed.is_empty() {
        None
    } else {
        Some(
            seed.parse()
                .with_context(|| format!("Seed must be an unsigned integer, got `{}`", seed))?,
        )
    };
    Ok((size, seed))
}

/// Generate maze, write it to file
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let (size, seed) = match args.size {
        Some(size) => (size, args.seed),
        None => ask_size_and_seed()?,
    };

    let mut recorder = MetricsRecorder::new();
    let mut gen = MazeGenerator::new(seed);
    let tree = gen.generate_observed(size, args.algorithm, &mut recorder)?;
    if args.verify && !tree.verify() {
        bail!("Generated edges do not form a spanning tree");
    }
    let grid = Grid::render(&tree)?;

    let output = match args.output {
        Some(path) => path,
        None => {
            fs::create_dir_all(&args.output_dir).with_context(|| {
                format!("Could not create directory {}", args.output_dir.display())
            })?;
            let seed = seed.map_or_else(|| "random".to_string(), |s| s.to_string());
            args.output_dir
                .join(format!("{}_{}_{}.txt", args.algorithm, size, seed))
        }
    };
    fs::write(&output, format!("{}\n", grid))
        .with_context(|| format!("Could not write maze to {}", output.display()))?;
    recorder.finished(&output.display().to_string());
    info!(output = %output.display(), "maze written");

    if args.print {
        if size <= 20 {
            println!("{}", grid);
        } else {
            println!("Maze of size {} generated, too large to display.", size);
        }
    }
    if args.metrics {
        recorder.print_report();
    }
    Ok(())
}
