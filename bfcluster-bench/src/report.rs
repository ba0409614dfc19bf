//! Solution-path summaries: console table and JSON report.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use bfcluster_core::{ClusterSettings, SolutionPath, SolutionRecord};
use serde::{Deserialize, Serialize};

/// One solved cluster count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordReport {
    pub nclust: usize,
    pub objective: f64,
    pub iterations: usize,
    pub status: String,
    pub primal_res: f64,
    pub dual_res: f64,
    pub solve_time_ms: u64,
    /// Co-membership matrix, row by row
    pub clustmat: Vec<Vec<f64>>,
}

impl From<&SolutionRecord> for RecordReport {
    fn from(rec: &SolutionRecord) -> Self {
        Self {
            nclust: rec.nclust,
            objective: rec.objective,
            iterations: rec.info.iters,
            status: rec.info.status.to_string(),
            primal_res: rec.info.primal_res,
            dual_res: rec.info.dual_res,
            solve_time_ms: rec.info.solve_time_ms,
            clustmat: rec
                .clustmat
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
        }
    }
}

/// Full report for one similarity matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathReport {
    /// Input file or synthetic instance name
    pub source: String,
    pub n: usize,
    pub max_iter: usize,
    pub tolerance: f64,
    pub admm_penalty: f64,
    pub records: Vec<RecordReport>,
}

impl PathReport {
    pub fn new(source: impl Into<String>, n: usize, settings: &ClusterSettings, path: &SolutionPath) -> Self {
        Self {
            source: source.into(),
            n,
            max_iter: settings.max_iter,
            tolerance: settings.tolerance,
            admm_penalty: settings.admm_penalty,
            records: path.iter().map(RecordReport::from).collect(),
        }
    }

    /// Save to JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file {}", path.as_ref().display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write JSON to {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn total_time_ms(&self) -> u64 {
        self.records.iter().map(|r| r.solve_time_ms).sum()
    }

    pub fn total_iterations(&self) -> usize {
        self.records.iter().map(|r| r.iterations).sum()
    }

    /// Print the per-count summary table.
    pub fn print_table(&self) {
        println!("\n{}", "=".repeat(72));
        println!("{} (n={})", self.source, self.n);
        println!("{}", "=".repeat(72));
        println!(
            "{:>6} {:>14} {:>6} {:>10} {:>11} {:>11} {:>9}",
            "k", "objective", "iters", "status", "primal_res", "dual_res", "time_ms"
        );
        println!("{}", "-".repeat(72));
        for r in &self.records {
            println!(
                "{:>6} {:>14.6e} {:>6} {:>10} {:>11.3e} {:>11.3e} {:>9}",
                r.nclust, r.objective, r.iterations, r.status, r.primal_res, r.dual_res, r.solve_time_ms
            );
        }
        println!("{}", "-".repeat(72));
        println!(
            "total: {} iterations, {} ms",
            self.total_iterations(),
            self.total_time_ms()
        );
    }
}
