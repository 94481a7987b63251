//! End-to-end search run: setup, search, render, teardown.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::error::Result;
use crate::nas::{Evaluator, PlaceholderEvaluator, RandomSearch, SearchOutcome};
use crate::simulation::{KinematicSimulator, SimulationProvider};
use crate::visualization::render;

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: SearchOutcome,
    /// Rendered chart files, one per metric
    pub charts: Vec<PathBuf>,
    /// Seed used, when one was configured
    pub seed: Option<u64>,
    pub duration_secs: f64,
}

/// Run with the in-process simulator and placeholder evaluator
pub fn execute(config: &RunConfig) -> Result<RunReport> {
    execute_reporting(config, |_| {})
}

/// Like [`execute`], calling `on_outcome` with the finished search before
/// any chart is rendered.
pub fn execute_reporting<F>(config: &RunConfig, on_outcome: F) -> Result<RunReport>
where
    F: FnOnce(&SearchOutcome),
{
    let evaluator = PlaceholderEvaluator::new(config.metric_ranges.clone())?;
    execute_with(config, &KinematicSimulator, &evaluator, on_outcome)
}

/// Run with explicit collaborators.
///
/// Order: setup, search, `on_outcome`, render, disconnect. The simulation
/// handle is released on every path once setup succeeded.
pub fn execute_with<P, E, F>(
    config: &RunConfig,
    provider: &P,
    evaluator: &E,
    on_outcome: F,
) -> Result<RunReport>
where
    P: SimulationProvider + ?Sized,
    E: Evaluator + ?Sized,
    F: FnOnce(&SearchOutcome),
{
    config.validate()?;
    let start = Instant::now();

    let search = RandomSearch::new(config.search_space.clone(), config.weights.clone())?;
    let mut rng = match config.seed {
        Some(s) => Xoshiro256PlusPlus::seed_from_u64(s),
        None => Xoshiro256PlusPlus::from_entropy(),
    };

    let sim = provider.setup(&config.scene)?;

    let searched = if config.parallel {
        search.run_parallel(&sim, evaluator, &mut rng, config.iterations)
    } else {
        search.run(&sim, evaluator, &mut rng, config.iterations)
    };

    let outcome = match searched {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "Search aborted");
            sim.disconnect();
            return Err(e);
        }
    };

    info!(
        best_score = outcome.best_score,
        architecture = %outcome.best_architecture,
        "Search finished"
    );
    on_outcome(&outcome);

    let charts = render(&outcome.history, &config.chart_config());
    sim.disconnect();

    Ok(RunReport {
        outcome,
        charts: charts?,
        seed: config.seed,
        duration_secs: start.elapsed().as_secs_f64(),
    })
}
