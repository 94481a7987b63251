//! Architecture Evaluator
//!
//! Metrics collected for a sampled architecture and the weighted score used
//! to rank them.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::search_space::Architecture;
use crate::error::{NasError, Result};
use crate::simulation::SimulationHandle;

/// Control performance metrics for one architecture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Control accuracy in percent
    pub control_accuracy: f64,
    /// Response time in milliseconds
    pub response_time: f64,
    /// Compute cost (GFLOPs proxy)
    pub compute: f64,
    /// Stability variance, smaller is better
    pub stability: f64,
}

impl EvaluationResult {
    /// Create new result
    pub fn new(control_accuracy: f64, response_time: f64, compute: f64, stability: f64) -> Self {
        Self {
            control_accuracy,
            response_time,
            compute,
            stability,
        }
    }

    /// Reject non-finite metrics and non-positive stability
    pub fn validate(&self) -> Result<()> {
        let metrics = [
            ("control_accuracy", self.control_accuracy),
            ("response_time", self.response_time),
            ("compute", self.compute),
            ("stability", self.stability),
        ];
        if let Some((name, value)) = metrics.iter().find(|(_, v)| !v.is_finite()) {
            return Err(NasError::InvalidMetric(format!("{} is not finite: {}", name, value)));
        }
        if self.stability <= 0.0 {
            return Err(NasError::InvalidMetric(format!(
                "stability must be strictly positive, got {}",
                self.stability
            )));
        }
        Ok(())
    }
}

/// Weights of the score aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub accuracy: f64,
    pub response_time: f64,
    pub compute: f64,
    pub stability: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            accuracy: 1.0,
            response_time: 0.5,
            compute: 0.2,
            stability: 0.3,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<()> {
        let all_finite = [self.accuracy, self.response_time, self.compute, self.stability]
            .iter()
            .all(|w| w.is_finite());
        if !all_finite {
            return Err(NasError::InvalidConfiguration(
                "score weights must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Combine metrics into a single ranking value.
///
/// `score = w_a*accuracy - w_r*response_time - w_c*compute + w_s/stability`
pub fn score(result: &EvaluationResult, weights: &ScoreWeights) -> Result<f64> {
    result.validate()?;

    let value = weights.accuracy * result.control_accuracy
        - weights.response_time * result.response_time
        - weights.compute * result.compute
        + weights.stability * (1.0 / result.stability);

    if !value.is_finite() {
        return Err(NasError::InvalidMetric(format!("score is not finite: {}", value)));
    }
    Ok(value)
}

/// Half-open sampling range `[low, high)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub low: f64,
    pub high: f64,
}

impl MetricRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low >= self.high {
            return Err(NasError::InvalidConfiguration(format!(
                "metric range '{}' must satisfy finite low < high, got [{}, {})",
                name, self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Ranges drawn by the placeholder evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRanges {
    pub control_accuracy: MetricRange,
    pub response_time: MetricRange,
    pub compute: MetricRange,
    pub stability: MetricRange,
}

impl Default for MetricRanges {
    fn default() -> Self {
        Self {
            control_accuracy: MetricRange::new(85.0, 95.0),
            response_time: MetricRange::new(10.0, 20.0),
            compute: MetricRange::new(2.0, 5.0),
            stability: MetricRange::new(0.02, 0.05),
        }
    }
}

impl MetricRanges {
    pub fn validate(&self) -> Result<()> {
        self.control_accuracy.validate("control_accuracy")?;
        self.response_time.validate("response_time")?;
        self.compute.validate("compute")?;
        self.stability.validate("stability")?;
        if self.stability.low <= 0.0 {
            return Err(NasError::InvalidConfiguration(format!(
                "stability range must be strictly positive, got low = {}",
                self.stability.low
            )));
        }
        Ok(())
    }
}

/// Measures an architecture deployed as a controller in the simulation
pub trait Evaluator: Send + Sync {
    /// Evaluate one architecture, drawing any randomness from `rng`
    fn evaluate(
        &self,
        sim: &SimulationHandle,
        arch: &Architecture,
        rng: &mut dyn RngCore,
    ) -> Result<EvaluationResult>;
}

/// Stand-in evaluator returning uniform random metrics.
///
/// The architecture does not influence the result.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderEvaluator {
    ranges: MetricRanges,
}

impl PlaceholderEvaluator {
    /// Create new evaluator
    pub fn new(ranges: MetricRanges) -> Result<Self> {
        ranges.validate()?;
        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &MetricRanges {
        &self.ranges
    }
}

impl Evaluator for PlaceholderEvaluator {
    fn evaluate(
        &self,
        sim: &SimulationHandle,
        _arch: &Architecture,
        rng: &mut dyn RngCore,
    ) -> Result<EvaluationResult> {
        if !sim.is_connected() {
            return Err(NasError::SimulationUnavailable(
                "simulation handle is not connected".to_string(),
            ));
        }

        let r = &self.ranges;
        let result = EvaluationResult {
            control_accuracy: rng.gen_range(r.control_accuracy.low..r.control_accuracy.high),
            response_time: rng.gen_range(r.response_time.low..r.response_time.high),
            compute: rng.gen_range(r.compute.low..r.compute.high),
            stability: rng.gen_range(r.stability.low..r.stability.high),
        };
        result.validate()?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nas::search_space::{sample, SearchSpace};
    use crate::simulation::{KinematicSimulator, SceneConfig, SimulationProvider};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_score_reference_value() {
        let result = EvaluationResult::new(90.0, 15.0, 3.0, 0.03);
        let value = score(&result, &ScoreWeights::default()).unwrap();
        assert!((value - 91.9).abs() < 1e-9, "got {}", value);
    }

    #[test]
    fn test_score_zero_stability() {
        let result = EvaluationResult::new(90.0, 15.0, 3.0, 0.0);
        let err = score(&result, &ScoreWeights::default()).unwrap_err();
        assert!(matches!(err, NasError::InvalidMetric(_)));
    }

    #[test]
    fn test_score_negative_stability() {
        let result = EvaluationResult::new(90.0, 15.0, 3.0, -0.01);
        assert!(matches!(
            score(&result, &ScoreWeights::default()),
            Err(NasError::InvalidMetric(_))
        ));
    }

    #[test]
    fn test_score_tiny_stability_overflows() {
        let result = EvaluationResult::new(90.0, 15.0, 3.0, 1e-320);
        assert!(matches!(
            score(&result, &ScoreWeights::default()),
            Err(NasError::InvalidMetric(_))
        ));
    }

    #[test]
    fn test_score_nan_metric() {
        let result = EvaluationResult::new(f64::NAN, 15.0, 3.0, 0.03);
        assert!(score(&result, &ScoreWeights::default()).is_err());
    }

    #[test]
    fn test_ranges_validation() {
        assert!(MetricRanges::default().validate().is_ok());

        let mut ranges = MetricRanges::default();
        ranges.stability = MetricRange::new(0.0, 0.05);
        assert!(PlaceholderEvaluator::new(ranges).is_err());

        let mut ranges = MetricRanges::default();
        ranges.compute = MetricRange::new(5.0, 2.0);
        assert!(ranges.validate().is_err());
    }

    #[test]
    fn test_placeholder_within_ranges() {
        let sim = KinematicSimulator.setup(&SceneConfig::default()).unwrap();
        let evaluator = PlaceholderEvaluator::default();
        let space = SearchSpace::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        for _ in 0..200 {
            let arch = sample(&space, &mut rng).unwrap();
            let m = evaluator.evaluate(&sim, &arch, &mut rng).unwrap();
            assert!((85.0..95.0).contains(&m.control_accuracy));
            assert!((10.0..20.0).contains(&m.response_time));
            assert!((2.0..5.0).contains(&m.compute));
            assert!((0.02..0.05).contains(&m.stability));
            assert!(score(&m, &ScoreWeights::default()).is_ok());
        }
    }

    #[test]
    fn test_placeholder_rejects_disconnected() {
        let mut sim = KinematicSimulator.setup(&SceneConfig::default()).unwrap();
        sim.mark_disconnected();
        let evaluator = PlaceholderEvaluator::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let arch = sample(&SearchSpace::default(), &mut rng).unwrap();

        let err = evaluator.evaluate(&sim, &arch, &mut rng).unwrap_err();
        assert!(matches!(err, NasError::SimulationUnavailable(_)));
    }
}
