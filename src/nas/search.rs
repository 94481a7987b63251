//! Random architecture search
//!
//! Samples architectures independently, scores each one and keeps the full
//! trial history together with the first best-scoring architecture.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::evaluator::{score, EvaluationResult, Evaluator, ScoreWeights};
use super::search_space::{sample, Architecture, SearchSpace};
use crate::error::{NasError, Result};
use crate::simulation::SimulationHandle;

/// One sample-evaluate-score cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTrial {
    /// Iteration index, starting at 0
    pub iteration: usize,
    /// Sampled architecture
    pub architecture: Architecture,
    /// Raw metrics
    pub result: EvaluationResult,
    /// Weighted score
    pub score: f64,
}

/// Result of a completed search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Architecture of the earliest trial with the highest score
    pub best_architecture: Architecture,
    /// Highest score seen
    pub best_score: f64,
    /// All trials in iteration order
    pub history: Vec<ScoredTrial>,
}

impl SearchOutcome {
    /// The trial that produced the best score
    pub fn best_trial(&self) -> Option<&ScoredTrial> {
        self.history
            .iter()
            .find(|t| t.score == self.best_score && t.architecture == self.best_architecture)
    }

    /// Number of trials run
    pub fn num_trials(&self) -> usize {
        self.history.len()
    }
}

/// Running best over trials. Strict improvement only, so ties keep the
/// earliest trial.
#[derive(Debug)]
struct BestTracker {
    best_score: f64,
    best_architecture: Option<Architecture>,
}

impl BestTracker {
    fn new() -> Self {
        Self {
            best_score: f64::NEG_INFINITY,
            best_architecture: None,
        }
    }

    fn observe(&mut self, trial: &ScoredTrial) {
        if trial.score > self.best_score {
            info!(
                iteration = trial.iteration,
                score = trial.score,
                architecture = %trial.architecture,
                "New best architecture"
            );
            self.best_score = trial.score;
            self.best_architecture = Some(trial.architecture.clone());
        }
    }

    fn finish(self, history: Vec<ScoredTrial>) -> Result<SearchOutcome> {
        let best_architecture = self.best_architecture.ok_or_else(|| {
            NasError::InvalidConfiguration("search produced no trials".to_string())
        })?;
        Ok(SearchOutcome {
            best_architecture,
            best_score: self.best_score,
            history,
        })
    }
}

/// Pure exploration search over a fixed space
#[derive(Debug, Clone)]
pub struct RandomSearch {
    space: SearchSpace,
    weights: ScoreWeights,
}

impl RandomSearch {
    /// Create new search, validating the space and weights
    pub fn new(space: SearchSpace, weights: ScoreWeights) -> Result<Self> {
        space.validate()?;
        weights.validate()?;
        Ok(Self { space, weights })
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    fn check_iterations(iterations: usize) -> Result<()> {
        if iterations == 0 {
            return Err(NasError::InvalidConfiguration(
                "iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn trial<E, R>(
        &self,
        iteration: usize,
        sim: &SimulationHandle,
        evaluator: &E,
        rng: &mut R,
    ) -> Result<ScoredTrial>
    where
        E: Evaluator + ?Sized,
        R: Rng,
    {
        let architecture = sample(&self.space, rng)?;
        let result = evaluator.evaluate(sim, &architecture, rng)?;
        let score = score(&result, &self.weights)?;

        debug!(
            iteration,
            score,
            accuracy = result.control_accuracy,
            response_time = result.response_time,
            compute = result.compute,
            stability = result.stability,
            "Trial complete"
        );

        Ok(ScoredTrial {
            iteration,
            architecture,
            result,
            score,
        })
    }

    /// Run `iterations` trials sequentially, drawing all randomness from `rng`.
    pub fn run<E, R>(
        &self,
        sim: &SimulationHandle,
        evaluator: &E,
        rng: &mut R,
        iterations: usize,
    ) -> Result<SearchOutcome>
    where
        E: Evaluator + ?Sized,
        R: Rng,
    {
        Self::check_iterations(iterations)?;
        info!(iterations, space_size = self.space.cardinality(), "Starting architecture search");

        let mut tracker = BestTracker::new();
        let mut history = Vec::with_capacity(iterations);

        for i in 0..iterations {
            let trial = self.trial(i, sim, evaluator, rng)?;
            tracker.observe(&trial);
            history.push(trial);
        }

        tracker.finish(history)
    }

    /// Run trials on the rayon pool.
    ///
    /// Each trial gets its own generator seeded from `rng`, so the outcome is
    /// reproducible for a seeded `rng` regardless of scheduling. Best tracking
    /// happens after collection, in iteration order.
    pub fn run_parallel<E, R>(
        &self,
        sim: &SimulationHandle,
        evaluator: &E,
        rng: &mut R,
        iterations: usize,
    ) -> Result<SearchOutcome>
    where
        E: Evaluator + ?Sized,
        R: Rng,
    {
        Self::check_iterations(iterations)?;
        info!(
            iterations,
            threads = rayon::current_num_threads(),
            "Starting parallel architecture search"
        );

        let seeds: Vec<u64> = (0..iterations).map(|_| rng.gen()).collect();

        let history = seeds
            .into_par_iter()
            .enumerate()
            .map(|(i, seed)| {
                let mut trial_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                self.trial(i, sim, evaluator, &mut trial_rng)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut tracker = BestTracker::new();
        for trial in &history {
            tracker.observe(trial);
        }
        tracker.finish(history)
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self {
            space: SearchSpace::default(),
            weights: ScoreWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nas::search_space::{Activation, LayerType};
    use crate::simulation::{KinematicSimulator, SceneConfig, SimulationProvider};
    use rand::RngCore;

    /// Returns scripted metrics in order, cycling when exhausted
    struct ScriptedEvaluator {
        results: Vec<EvaluationResult>,
        next: std::sync::atomic::AtomicUsize,
    }

    impl ScriptedEvaluator {
        fn new(results: Vec<EvaluationResult>) -> Self {
            Self {
                results,
                next: std::sync::atomic::AtomicUsize::new(0),
            }
        }
    }

    impl Evaluator for ScriptedEvaluator {
        fn evaluate(
            &self,
            _sim: &SimulationHandle,
            _arch: &Architecture,
            _rng: &mut dyn RngCore,
        ) -> Result<EvaluationResult> {
            let i = self.next.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(self.results[i % self.results.len()])
        }
    }

    fn sim() -> SimulationHandle {
        KinematicSimulator.setup(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let search = RandomSearch::default();
        let evaluator = crate::nas::PlaceholderEvaluator::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        let err = search.run(&sim(), &evaluator, &mut rng, 0).unwrap_err();
        assert!(matches!(err, NasError::InvalidConfiguration(_)));
        assert!(search.run_parallel(&sim(), &evaluator, &mut rng, 0).is_err());
    }

    #[test]
    fn test_history_indices() {
        let search = RandomSearch::default();
        let evaluator = crate::nas::PlaceholderEvaluator::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);

        let outcome = search.run(&sim(), &evaluator, &mut rng, 25).unwrap();
        assert_eq!(outcome.num_trials(), 25);
        for (i, trial) in outcome.history.iter().enumerate() {
            assert_eq!(trial.iteration, i);
        }
    }

    #[test]
    fn test_ties_keep_earliest() {
        let space = SearchSpace::new(
            vec![3, 5],
            vec![LayerType::Residual],
            vec![Activation::ReLU],
            vec![false],
            vec![false],
        )
        .unwrap();
        let search = RandomSearch::new(space, ScoreWeights::default()).unwrap();
        let evaluator = ScriptedEvaluator::new(vec![
            EvaluationResult::new(80.0, 15.0, 3.0, 0.03),
            EvaluationResult::new(90.0, 15.0, 3.0, 0.03),
            EvaluationResult::new(70.0, 15.0, 3.0, 0.03),
            EvaluationResult::new(90.0, 15.0, 3.0, 0.03),
        ]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);

        let outcome = search.run(&sim(), &evaluator, &mut rng, 4).unwrap();
        assert!((outcome.best_score - 91.9).abs() < 1e-9);
        assert_eq!(outcome.best_architecture, outcome.history[1].architecture);
        assert_eq!(outcome.best_trial().map(|t| t.iteration), Some(1));
    }

    #[test]
    fn test_invalid_metric_aborts_run() {
        let search = RandomSearch::default();
        let evaluator = ScriptedEvaluator::new(vec![
            EvaluationResult::new(90.0, 15.0, 3.0, 0.03),
            EvaluationResult::new(90.0, 15.0, 3.0, 0.0),
        ]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);

        let err = search.run(&sim(), &evaluator, &mut rng, 5).unwrap_err();
        assert!(matches!(err, NasError::InvalidMetric(_)));
    }

    #[test]
    fn test_parallel_is_deterministic() {
        let search = RandomSearch::default();
        let evaluator = crate::nas::PlaceholderEvaluator::default();
        let handle = sim();

        let mut a = Xoshiro256PlusPlus::seed_from_u64(77);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(77);
        let first = search.run_parallel(&handle, &evaluator, &mut a, 64).unwrap();
        let second = search.run_parallel(&handle, &evaluator, &mut b, 64).unwrap();

        assert_eq!(first.history, second.history);
        assert_eq!(first.best_score, second.best_score);
        for (i, trial) in first.history.iter().enumerate() {
            assert_eq!(trial.iteration, i);
        }
    }
}
