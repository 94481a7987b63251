//! Neural Architecture Search (NAS) Module
//!
//! Random search over controller network hyperparameters:
//! - Discrete search space and uniform sampling
//! - Evaluator interface and score aggregation
//! - Sequential and rayon-parallel search loops

mod search_space;
mod evaluator;
mod search;

pub use search_space::{sample, Activation, Architecture, LayerType, SearchSpace};
pub use evaluator::{
    score, EvaluationResult, Evaluator, MetricRange, MetricRanges, PlaceholderEvaluator,
    ScoreWeights,
};
pub use search::{RandomSearch, ScoredTrial, SearchOutcome};
