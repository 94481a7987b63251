//! Visualization module — per-metric charts of the search history.

mod chart;

pub use chart::LineChart;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{NasError, Result};
use crate::nas::ScoredTrial;

/// Series plotted against the iteration index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    ControlAccuracy,
    ResponseTime,
    Compute,
    Stability,
    Score,
}

impl MetricKind {
    /// All metrics, in rendering order
    pub fn all() -> [Self; 5] {
        [
            Self::ControlAccuracy,
            Self::ResponseTime,
            Self::Compute,
            Self::Stability,
            Self::Score,
        ]
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::ControlAccuracy => "figure1_control_accuracy.svg",
            Self::ResponseTime => "figure2_response_time.svg",
            Self::Compute => "figure3_computational_efficiency.svg",
            Self::Stability => "figure4_stability.svg",
            Self::Score => "figure5_performance_score.svg",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ControlAccuracy => "NAS Control Accuracy",
            Self::ResponseTime => "NAS Response Time",
            Self::Compute => "NAS Computational Efficiency",
            Self::Stability => "NAS Stability",
            Self::Score => "NAS Performance Score",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            Self::ControlAccuracy => "Control Accuracy (%)",
            Self::ResponseTime => "Response Time (ms)",
            Self::Compute => "GFLOPs",
            Self::Stability => "Stability Variance",
            Self::Score => "Performance Score",
        }
    }

    pub fn legend(&self) -> &'static str {
        match self {
            Self::ControlAccuracy => "Control Accuracy (%)",
            Self::ResponseTime => "Response Time (ms)",
            Self::Compute => "Computational Efficiency (GFLOPs)",
            Self::Stability => "Stability (Variance)",
            Self::Score => "Performance Score",
        }
    }

    /// Extract this metric from a trial
    pub fn value(&self, trial: &ScoredTrial) -> f64 {
        match self {
            Self::ControlAccuracy => trial.result.control_accuracy,
            Self::ResponseTime => trial.result.response_time,
            Self::Compute => trial.result.compute,
            Self::Stability => trial.result.stability,
            Self::Score => trial.score,
        }
    }
}

/// Chart output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Directory the charts are written to
    pub output_dir: PathBuf,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            width: 640,
            height: 480,
        }
    }
}

impl ChartConfig {
    /// Builder method to set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

/// Write one chart per metric. Returns the paths in `MetricKind::all()` order.
pub fn render(history: &[ScoredTrial], config: &ChartConfig) -> Result<Vec<PathBuf>> {
    if history.is_empty() {
        return Err(NasError::InvalidConfiguration(
            "cannot render charts for an empty history".to_string(),
        ));
    }
    fs::create_dir_all(&config.output_dir)?;

    MetricKind::all()
        .iter()
        .map(|metric| render_metric(history, *metric, config))
        .collect()
}

fn render_metric(history: &[ScoredTrial], metric: MetricKind, config: &ChartConfig) -> Result<PathBuf> {
    let points: Vec<(f64, f64)> = history
        .iter()
        .map(|t| (t.iteration as f64, metric.value(t)))
        .collect();

    let chart = LineChart {
        title: metric.title(),
        x_label: "Iteration",
        y_label: metric.y_label(),
        legend: metric.legend(),
        width: config.width,
        height: config.height,
    };

    let path = chart_path(&config.output_dir, metric);
    fs::write(&path, chart.to_svg(&points))?;
    info!(path = %path.display(), "Chart written");
    Ok(path)
}

fn chart_path(dir: &Path, metric: MetricKind) -> PathBuf {
    dir.join(metric.file_name())
}
