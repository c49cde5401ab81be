use indexmap::IndexMap;
use ndarray::{arr2, Array1, Array2};

use super::{EgoState, SceneId};

/// Inputs and outputs of every simulated ego step, per scene.
pub type EgoInsOuts = IndexMap<SceneId, Vec<UnrollInputOutput>>;
/// Inputs and outputs of the other agents, per scene and then per step.
pub type AgentsInsOuts = IndexMap<SceneId, Vec<Vec<UnrollInputOutput>>>;

#[derive(Debug, Clone, PartialEq)]
pub struct UnrollInputs {
    pub centroid: [f64; 2],
    pub yaw: f64,
    /// Future positions from the log, `[future_len, 2]`.
    pub target_positions: Array2<f64>,
    pub target_yaws: Array1<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnrollOutputs {
    /// Predicted future positions, `[future_len, 2]`.
    pub positions: Array2<f64>,
    pub yaws: Array1<f64>,
}

/// What went into the model and what came out for one agent at one step.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrollInputOutput {
    pub track_id: i64,
    pub inputs: UnrollInputs,
    pub outputs: UnrollOutputs,
}

impl UnrollInputOutput {
    /// Record for a single-step horizon: the logged next state as target and
    /// the predicted next state as output.
    pub fn single_step(
        track_id: i64,
        current: &EgoState,
        target: &EgoState,
        predicted: &EgoState,
    ) -> Self {
        Self {
            track_id,
            inputs: UnrollInputs {
                centroid: current.centroid,
                yaw: current.yaw,
                target_positions: arr2(&[target.centroid]),
                target_yaws: Array1::from_elem(1, target.yaw),
            },
            outputs: UnrollOutputs {
                positions: arr2(&[predicted.centroid]),
                yaws: Array1::from_elem(1, predicted.yaw),
            },
        }
    }
}
