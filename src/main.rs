//! Robot NAS - Main Entry Point
//!
//! Loads the robot scene, runs the architecture search, prints the best
//! architecture and renders one chart per metric.

use clap::Parser;
use robot_nas::cli::{cmd_search, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "robot_nas=info".into()),
        )
        .init();

    let cli = Cli::parse();
    cmd_search(&cli)
}
