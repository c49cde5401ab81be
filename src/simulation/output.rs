use ndarray::{Array1, Array2};

use super::{EgoState, SceneId, SimulationDataset};
use crate::error::EvalError;

/// Everything the evaluator needs to know about one rolled-out scene.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub scene_id: SceneId,
    /// Logged ego centroids, `[frames, 2]`.
    pub recorded_centroids: Array2<f64>,
    pub recorded_yaws: Array1<f64>,
    /// Simulated ego centroids, `[frames, 2]`.
    pub simulated_centroids: Array2<f64>,
    pub simulated_yaws: Array1<f64>,
}

impl SimulationOutput {
    /// Snapshots the logged and simulated ego trajectories of `scene_id`. The
    /// unroll records stay with the caller; no metric reads them.
    pub fn new(scene_id: SceneId, sim_dataset: &SimulationDataset) -> Result<Self, EvalError> {
        let scene = sim_dataset.scene(scene_id)?;
        let (recorded_centroids, recorded_yaws) = stack_states(scene.recorded());
        let (simulated_centroids, simulated_yaws) = stack_states(scene.simulated());

        Ok(Self {
            scene_id,
            recorded_centroids,
            recorded_yaws,
            simulated_centroids,
            simulated_yaws,
        })
    }

    pub fn num_frames(&self) -> usize {
        self.recorded_yaws.len()
    }
}

fn stack_states(states: &[EgoState]) -> (Array2<f64>, Array1<f64>) {
    let mut centroids = Array2::zeros((states.len(), 2));
    for (mut row, state) in centroids.rows_mut().into_iter().zip(states) {
        row[0] = state.centroid[0];
        row[1] = state.centroid[1];
    }
    let yaws = states.iter().map(|s| s.yaw).collect();
    (centroids, yaws)
}
