//! Robot NAS CLI Module
//!
//! Command-line interface for running the architecture search.

use clap::Parser;
use colored::*;
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::nas::SearchOutcome;
use crate::runner::{execute_reporting, RunReport};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString    { s.truecolor(100, 210, 120) }

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn row(key: &str, val: impl std::fmt::Display) {
    println!("  {:<16} {}", muted(key), val);
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "robot-nas")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Random neural architecture search for robot controllers")]
#[command(long_about = None)]
pub struct Cli {
    /// JSON run configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of search iterations
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Random seed for reproducible runs
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Directory for the rendered charts
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Evaluate trials in parallel
    #[arg(long)]
    pub parallel: bool,
}

impl Cli {
    /// Resolve the run configuration. Flags override the config file.
    pub fn run_config(&self) -> crate::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(n) = self.iterations {
            config.iterations = n;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.parallel {
            config.parallel = true;
        }

        config.validate()?;
        Ok(config)
    }
}

// ─── Search ────────────────────────────────────────────────────────────────────

pub fn cmd_search(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.run_config()?;
    let report = execute_reporting(&config, |outcome| print_outcome(&config, outcome))?;
    print_charts(&report);
    Ok(())
}

/// Printed before charts are rendered, so a rendering failure still shows the result
fn print_outcome(config: &RunConfig, outcome: &SearchOutcome) {
    let arch = &outcome.best_architecture;

    section("Search");
    row("Robot", &config.scene.robot_model);
    row("Iterations", outcome.num_trials());
    row("Seed", config.seed.map_or_else(|| "entropy".to_string(), |s| s.to_string()));
    row("Mode", if config.parallel { "parallel" } else { "sequential" });

    section("Best Architecture");
    row("depth", arch.depth);
    row("layer_type", arch.layer_type.as_str());
    row("activation", arch.activation.as_str());
    row("skip_connection", arch.skip_connection);
    row("layer_norm", arch.layer_norm);
    row("score", format!("{:.4}", outcome.best_score).white().bold());
    if let Some(trial) = outcome.best_trial() {
        row("iteration", trial.iteration);
    }
    println!();

    println!("Best Architecture: {}", arch);
}

fn print_charts(report: &RunReport) {
    section("Charts");
    for path in &report.charts {
        println!("  {} {}", ok("✓"), path.display());
    }
    println!("  {}", dim(&format!("done in {:.3}s", report.duration_secs)));
    println!();
}
