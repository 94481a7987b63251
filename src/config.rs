//! Run configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NasError, Result};
use crate::nas::{MetricRanges, ScoreWeights, SearchSpace};
use crate::simulation::SceneConfig;
use crate::visualization::ChartConfig;

/// Configuration for a complete search run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of trials
    pub iterations: usize,

    /// Random seed (`None` seeds from entropy)
    pub seed: Option<u64>,

    /// Evaluate trials on the rayon pool
    pub parallel: bool,

    /// Directory for rendered charts
    pub output_dir: PathBuf,

    pub search_space: SearchSpace,

    pub scene: SceneConfig,

    /// Sampling ranges of the placeholder evaluator
    pub metric_ranges: MetricRanges,

    pub weights: ScoreWeights,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            seed: None,
            parallel: false,
            output_dir: PathBuf::from("."),
            search_space: SearchSpace::default(),
            scene: SceneConfig::default(),
            metric_ranges: MetricRanges::default(),
            weights: ScoreWeights::default(),
        }
    }
}

impl RunConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method to set number of iterations
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Builder method to set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to enable parallel evaluation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builder method to set the chart directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_search_space(mut self, space: SearchSpace) -> Self {
        self.search_space = space;
        self
    }

    pub fn with_scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(NasError::InvalidConfiguration(
                "iterations must be at least 1".to_string(),
            ));
        }
        self.search_space.validate()?;
        self.metric_ranges.validate()?;
        self.weights.validate()?;
        Ok(())
    }

    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig::default().with_output_dir(self.output_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.iterations, 100);
        assert!(config.seed.is_none());
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::new()
            .with_iterations(10)
            .with_seed(42)
            .with_parallel(true)
            .with_output_dir("out");

        assert_eq!(config.iterations, 10);
        assert_eq!(config.seed, Some(42));
        assert!(config.parallel);
        assert_eq!(config.chart_config().output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_zero_iterations_invalid() {
        let config = RunConfig::new().with_iterations(0);
        assert!(matches!(
            config.validate(),
            Err(NasError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, r#"{"iterations": 12, "seed": 9}"#).unwrap();

        let config = RunConfig::from_file(&path).unwrap();
        assert_eq!(config.iterations, 12);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.scene, SceneConfig::default());
    }

    #[test]
    fn test_from_file_rejects_empty_space() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{"search_space": {"depth": [], "layer_type": ["residual"],
                "activation": ["tanh"], "skip_connection": [true], "layer_norm": [true]}}"#,
        )
        .unwrap();

        assert!(matches!(
            RunConfig::from_file(&path),
            Err(NasError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_file_rejects_duplicate_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{"search_space": {"depth": [3, 3, 3, 5], "layer_type": ["residual"],
                "activation": ["tanh"], "skip_connection": [true], "layer_norm": [true]}}"#,
        )
        .unwrap();

        let err = RunConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, NasError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn test_from_file_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, "{ iterations: ").unwrap();

        assert!(matches!(
            RunConfig::from_file(&path),
            Err(NasError::SerializationError(_))
        ));
    }
}
