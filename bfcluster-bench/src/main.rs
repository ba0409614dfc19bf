//! Command-line front end and benchmarks for bfcluster.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use bfcluster_core::{cluster_path, ClusterProblem, ClusterSettings, SolutionPath};
use clap::{Args, Parser, Subcommand};
use nalgebra::DMatrix;

mod matrix_io;
mod report;
mod test_problems;

use report::PathReport;
use test_problems::{bench_suite, BlockSimilarity};

#[derive(Parser, Debug)]
#[command(name = "bfcluster", about = "Birkhoff-Fantope convex clustering", version)]
struct Cli {
    /// Debug-level logging
    #[arg(long, short, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster a dense similarity matrix read from a file
    Solve {
        /// Whitespace or comma separated matrix, one row per line
        file: PathBuf,

        #[command(flatten)]
        solver: SolverArgs,
    },

    /// Cluster a synthetic block similarity matrix
    Synthetic {
        /// Number of planted blocks
        #[arg(long, default_value_t = 3)]
        blocks: usize,

        /// Points per block
        #[arg(long, default_value_t = 4)]
        block_size: usize,

        /// Within-block similarity
        #[arg(long, default_value_t = 0.9)]
        within: f64,

        /// Between-block similarity
        #[arg(long, default_value_t = 0.1)]
        between: f64,

        /// Uniform noise half-width
        #[arg(long, default_value_t = 0.05)]
        noise: f64,

        #[arg(long, default_value_t = 12345)]
        seed: u64,

        #[command(flatten)]
        solver: SolverArgs,
    },

    /// Run the fixed synthetic benchmark suite
    Bench {
        /// Maximum ADMM iterations per cluster count
        #[arg(long)]
        max_iter: Option<usize>,

        /// Write all reports as a JSON array
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SolverArgs {
    /// Cluster counts, solved in the given order (repeatable)
    #[arg(short = 'k', long = "nclust", required = true, num_args = 1..)]
    nclust: Vec<usize>,

    /// Maximum ADMM iterations per cluster count
    #[arg(long)]
    max_iter: Option<usize>,

    /// Convergence tolerance (scaled by sqrt(n))
    #[arg(long)]
    tolerance: Option<f64>,

    /// ADMM penalty parameter
    #[arg(long)]
    penalty: Option<f64>,

    /// Progress markers on stderr (repeat for iteration counts)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write the solution path as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl SolverArgs {
    /// CLI flags layered over `ClusterSettings::default()` (which reads `BFCLUSTER_*`).
    fn settings(&self) -> ClusterSettings {
        let mut settings = ClusterSettings::default();
        if let Some(max_iter) = self.max_iter {
            settings.max_iter = max_iter;
        }
        if let Some(tolerance) = self.tolerance {
            settings.tolerance = tolerance;
        }
        if let Some(penalty) = self.penalty {
            settings.admm_penalty = penalty;
        }
        if self.verbose > 0 {
            settings.verbose = self.verbose;
        }
        settings
    }
}

fn run_path(source: &str, similarity: DMatrix<f64>, args: &SolverArgs) -> Result<()> {
    let settings = args.settings();
    let n = similarity.nrows();
    log::info!("{}: n={} nclust={:?}", source, n, args.nclust);

    let problem = ClusterProblem::new(similarity, args.nclust.clone());
    let path: SolutionPath = cluster_path(&problem, &settings)
        .with_context(|| format!("Clustering {} failed", source))?;

    let report = PathReport::new(source, n, &settings, &path);
    report.print_table();

    if let Some(out) = &args.json {
        report.save_json(out)?;
        log::info!("Report written to {}", out.display());
    }
    Ok(())
}

fn run_bench(max_iter: Option<usize>, json: Option<PathBuf>) -> Result<()> {
    let mut settings = ClusterSettings::default();
    if let Some(max_iter) = max_iter {
        settings.max_iter = max_iter;
    }

    println!("bfcluster benchmarks");
    println!("====================");

    let mut reports = Vec::new();
    let start = Instant::now();
    for prob in bench_suite() {
        let n = prob.similarity.dim();
        let problem = ClusterProblem::new(prob.similarity.build(), prob.nclust.clone());
        let path = cluster_path(&problem, &settings)
            .with_context(|| format!("Benchmark {} failed", prob.name))?;
        let report = PathReport::new(prob.name, n, &settings, &path);
        report.print_table();
        reports.push(report);
    }

    println!("\n{}", "=".repeat(72));
    println!("{:<20} {:>6} {:>10} {:>10} {:>10}", "problem", "n", "counts", "iters", "time_ms");
    println!("{}", "-".repeat(72));
    for r in &reports {
        let converged = r.records.iter().filter(|rec| rec.status == "Converged").count();
        println!(
            "{:<20} {:>6} {:>10} {:>10} {:>10}",
            r.source,
            r.n,
            format!("{}/{}", converged, r.records.len()),
            r.total_iterations(),
            r.total_time_ms()
        );
    }
    println!("{}", "-".repeat(72));
    println!("Suite wall time: {:.3} ms", start.elapsed().as_secs_f64() * 1000.0);

    if let Some(out) = json {
        let file = std::fs::File::create(&out)
            .with_context(|| format!("Failed to create file {}", out.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &reports)
            .with_context(|| format!("Failed to write JSON to {}", out.display()))?;
        log::info!("Reports written to {}", out.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    match cli.command {
        Command::Solve { file, solver } => {
            let similarity = matrix_io::load_dense_matrix(&file)?;
            run_path(&file.display().to_string(), similarity, &solver)
        }
        Command::Synthetic { blocks, block_size, within, between, noise, seed, solver } => {
            let planted = BlockSimilarity { blocks, block_size, within, between, noise, seed };
            let name = format!("synthetic {}x{} (seed {})", blocks, block_size, seed);
            run_path(&name, planted.build(), &solver)
        }
        Command::Bench { max_iter, json } => run_bench(max_iter, json),
    }
}
