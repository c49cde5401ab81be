use ndarray::Array3;

use crate::simulation::{AgentsInsOuts, EgoInsOuts, SceneId, SimulationDataset};

/// Ego predictions for the current step.
#[derive(Debug, Clone, PartialEq)]
pub struct EgoOutput {
    /// `[batch, future_len, 2]`
    pub positions: Array3<f64>,
    /// `[batch, future_len, 1]`
    pub yaws: Array3<f64>,
}

/// Ego targets from the log for the current step.
#[derive(Debug, Clone, PartialEq)]
pub struct EgoInput {
    /// `[batch, future_len, 2]`
    pub target_positions: Array3<f64>,
    /// `[batch, future_len, 1]`
    pub target_yaws: Array3<f64>,
}

/// Read-only view of one simulation step handed to a [`Reward`](super::Reward).
#[derive(Debug, Clone, Copy)]
pub struct RewardInput<'a> {
    /// Current step in the episode.
    pub frame_index: usize,
    /// Scenes rolled out in parallel.
    pub scene_indices: &'a [SceneId],
    pub sim_dataset: &'a SimulationDataset,
    pub ego_ins_outs: &'a EgoInsOuts,
    pub agents_ins_outs: &'a AgentsInsOuts,
    pub ego_output: &'a EgoOutput,
    pub ego_input: &'a EgoInput,
}
