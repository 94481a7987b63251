//! Robot NAS - Random neural architecture search for robot controllers
//!
//! This crate samples controller network hyperparameters from a discrete
//! search space, scores each sample against a loaded robot simulation and
//! keeps the best-scoring architecture along with the full trial history.
//!
//! # Modules
//!
//! - [`nas`] - Search space, evaluator interface, score and search loop
//! - [`simulation`] - Scene setup and the simulation handle
//! - [`visualization`] - Per-metric charts of the trial history
//! - [`config`] - Run configuration
//! - [`runner`] - Setup, search, render and teardown in one call
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Search
pub mod nas;
pub mod simulation;

// Output
pub mod visualization;

// Configuration and services
pub mod config;
pub mod runner;
pub mod cli;

pub use error::{NasError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{NasError, Result};

    pub use crate::nas::{
        sample, score, Activation, Architecture, EvaluationResult, Evaluator, LayerType,
        MetricRanges, PlaceholderEvaluator, RandomSearch, ScoreWeights, ScoredTrial,
        SearchOutcome, SearchSpace,
    };

    pub use crate::simulation::{KinematicSimulator, SceneConfig, SimulationHandle, SimulationProvider};

    pub use crate::visualization::{render, ChartConfig, MetricKind};

    pub use crate::config::RunConfig;

    pub use crate::runner::{execute, execute_reporting, execute_with, RunReport};
}
