//! Simulation environment
//!
//! Loads a robot scene and hands out the handle that the search loop and
//! evaluator share. The handle is threaded explicitly from setup through
//! the search to teardown.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{NasError, Result};

/// Scene to load before the search starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Robot model description
    pub robot_model: String,
    /// Ground plane model description
    pub ground_model: String,
    /// Gravity vector in m/s^2
    pub gravity: [f64; 3],
    /// Whether the robot base is fixed to the world
    pub fixed_base: bool,
    /// Number of actuated joints
    pub degrees_of_freedom: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            robot_model: "kuka_iiwa/model.urdf".to_string(),
            ground_model: "plane.urdf".to_string(),
            gravity: [0.0, 0.0, -9.8],
            fixed_base: true,
            degrees_of_freedom: 7,
        }
    }
}

impl SceneConfig {
    /// Builder method to set the robot model
    pub fn with_robot_model(mut self, model: impl Into<String>) -> Self {
        self.robot_model = model.into();
        self
    }

    /// Builder method to set gravity
    pub fn with_gravity(mut self, gravity: [f64; 3]) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder method to set the joint count
    pub fn with_degrees_of_freedom(mut self, dof: usize) -> Self {
        self.degrees_of_freedom = dof;
        self
    }
}

/// Connected simulation with a loaded scene
#[derive(Debug)]
pub struct SimulationHandle {
    scene: SceneConfig,
    ground_id: u32,
    robot_id: u32,
    connected: bool,
}

impl SimulationHandle {
    pub fn scene(&self) -> &SceneConfig {
        &self.scene
    }

    pub fn ground_id(&self) -> u32 {
        self.ground_id
    }

    pub fn robot_id(&self) -> u32 {
        self.robot_id
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Release the simulation. The handle cannot be used afterwards.
    pub fn disconnect(mut self) {
        self.connected = false;
        info!(robot_id = self.robot_id, "Simulation disconnected");
    }

    #[cfg(test)]
    pub(crate) fn mark_disconnected(&mut self) {
        self.connected = false;
    }
}

/// Source of simulation handles
pub trait SimulationProvider {
    /// Connect and load the configured scene
    fn setup(&self, scene: &SceneConfig) -> Result<SimulationHandle>;
}

/// In-process provider that validates and registers the scene bodies.
///
/// No dynamics are stepped; the handle only identifies the loaded robot.
#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicSimulator;

impl KinematicSimulator {
    fn check_model(kind: &str, model: &str) -> Result<()> {
        if model.trim().is_empty() {
            return Err(NasError::SimulationUnavailable(format!(
                "{} model path is empty",
                kind
            )));
        }
        if !model.ends_with(".urdf") {
            return Err(NasError::SimulationUnavailable(format!(
                "{} model '{}' is not a URDF description",
                kind, model
            )));
        }
        Ok(())
    }
}

impl SimulationProvider for KinematicSimulator {
    fn setup(&self, scene: &SceneConfig) -> Result<SimulationHandle> {
        Self::check_model("ground", &scene.ground_model)?;
        Self::check_model("robot", &scene.robot_model)?;

        if scene.degrees_of_freedom == 0 {
            return Err(NasError::SimulationUnavailable(
                "robot must have at least one degree of freedom".to_string(),
            ));
        }
        if scene.gravity.iter().any(|g| !g.is_finite()) {
            return Err(NasError::SimulationUnavailable(format!(
                "gravity must be finite, got {:?}",
                scene.gravity
            )));
        }

        debug!(model = %scene.ground_model, body_id = 0, "Loaded ground");
        debug!(model = %scene.robot_model, body_id = 1, fixed_base = scene.fixed_base, "Loaded robot");
        info!(
            robot = %scene.robot_model,
            dof = scene.degrees_of_freedom,
            gravity = ?scene.gravity,
            "Simulation connected"
        );

        Ok(SimulationHandle {
            scene: scene.clone(),
            ground_id: 0,
            robot_id: 1,
            connected: true,
        })
    }
}
