//! NAS Search Space Definition
//!
//! Defines the discrete space of controller network hyperparameters and
//! uniform sampling over it.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NasError, Result};

/// Kind of layer stacked in the controller network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerType {
    /// Fully connected layer
    FullyConnected,
    /// Convolutional layer
    Convolutional,
    /// Residual block
    Residual,
}

impl LayerType {
    /// All layer types
    pub fn all() -> Vec<Self> {
        vec![Self::FullyConnected, Self::Convolutional, Self::Residual]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullyConnected => "fully_connected",
            Self::Convolutional => "convolutional",
            Self::Residual => "residual",
        }
    }
}

/// Activation function applied after each layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Rectified linear unit
    #[serde(rename = "relu")]
    ReLU,
    /// Hyperbolic tangent
    Tanh,
    /// Logistic sigmoid
    Sigmoid,
}

impl Activation {
    /// All activation functions
    pub fn all() -> Vec<Self> {
        vec![Self::ReLU, Self::Tanh, Self::Sigmoid]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReLU => "relu",
            Self::Tanh => "tanh",
            Self::Sigmoid => "sigmoid",
        }
    }
}

/// One concrete choice for every hyperparameter in the search space
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Architecture {
    /// Number of layers
    pub depth: u32,
    /// Layer kind
    pub layer_type: LayerType,
    /// Activation function
    pub activation: Activation,
    /// Whether skip connections are used
    pub skip_connection: bool,
    /// Whether layer normalization is applied
    pub layer_norm: bool,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth={} layer_type={} activation={} skip_connection={} layer_norm={}",
            self.depth,
            self.layer_type.as_str(),
            self.activation.as_str(),
            self.skip_connection,
            self.layer_norm
        )
    }
}

/// Allowed values per hyperparameter. Every value set is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    depth: Vec<u32>,
    layer_type: Vec<LayerType>,
    activation: Vec<Activation>,
    skip_connection: Vec<bool>,
    layer_norm: Vec<bool>,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            depth: vec![3, 5, 7, 10, 15],
            layer_type: LayerType::all(),
            activation: Activation::all(),
            skip_connection: vec![true, false],
            layer_norm: vec![true, false],
        }
    }
}

impl SearchSpace {
    /// Create a validated search space
    pub fn new(
        depth: Vec<u32>,
        layer_type: Vec<LayerType>,
        activation: Vec<Activation>,
        skip_connection: Vec<bool>,
        layer_norm: Vec<bool>,
    ) -> Result<Self> {
        let space = Self {
            depth,
            layer_type,
            activation,
            skip_connection,
            layer_norm,
        };
        space.validate()?;
        Ok(space)
    }

    /// Check that every value set is non-empty and free of duplicates
    pub fn validate(&self) -> Result<()> {
        let sets = [
            ("depth", self.depth.len(), has_duplicates(&self.depth)),
            ("layer_type", self.layer_type.len(), has_duplicates(&self.layer_type)),
            ("activation", self.activation.len(), has_duplicates(&self.activation)),
            ("skip_connection", self.skip_connection.len(), has_duplicates(&self.skip_connection)),
            ("layer_norm", self.layer_norm.len(), has_duplicates(&self.layer_norm)),
        ];
        for (key, len, duplicated) in sets {
            if len == 0 {
                return Err(NasError::InvalidConfiguration(format!(
                    "search space value set '{}' is empty",
                    key
                )));
            }
            if duplicated {
                return Err(NasError::InvalidConfiguration(format!(
                    "search space value set '{}' contains duplicate values",
                    key
                )));
            }
        }
        Ok(())
    }

    pub fn depth_choices(&self) -> &[u32] {
        &self.depth
    }

    pub fn layer_type_choices(&self) -> &[LayerType] {
        &self.layer_type
    }

    pub fn activation_choices(&self) -> &[Activation] {
        &self.activation
    }

    pub fn skip_connection_choices(&self) -> &[bool] {
        &self.skip_connection
    }

    pub fn layer_norm_choices(&self) -> &[bool] {
        &self.layer_norm
    }

    /// Number of distinct architectures in the space
    pub fn cardinality(&self) -> usize {
        self.depth.len()
            * self.layer_type.len()
            * self.activation.len()
            * self.skip_connection.len()
            * self.layer_norm.len()
    }

    /// Whether every field of `arch` is a member of its value set
    pub fn contains(&self, arch: &Architecture) -> bool {
        self.depth.contains(&arch.depth)
            && self.layer_type.contains(&arch.layer_type)
            && self.activation.contains(&arch.activation)
            && self.skip_connection.contains(&arch.skip_connection)
            && self.layer_norm.contains(&arch.layer_norm)
    }
}

/// Draw one architecture, each key independently and uniformly.
pub fn sample<R: Rng + ?Sized>(space: &SearchSpace, rng: &mut R) -> Result<Architecture> {
    Ok(Architecture {
        depth: choose(&space.depth, "depth", rng)?,
        layer_type: choose(&space.layer_type, "layer_type", rng)?,
        activation: choose(&space.activation, "activation", rng)?,
        skip_connection: choose(&space.skip_connection, "skip_connection", rng)?,
        layer_norm: choose(&space.layer_norm, "layer_norm", rng)?,
    })
}

fn has_duplicates<T: PartialEq>(values: &[T]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, v)| values[i + 1..].contains(v))
}

fn choose<T: Copy, R: Rng + ?Sized>(values: &[T], key: &str, rng: &mut R) -> Result<T> {
    values.choose(rng).copied().ok_or_else(|| {
        NasError::InvalidConfiguration(format!("search space value set '{}' is empty", key))
    })
}
