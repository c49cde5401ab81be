use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::SceneId;
use crate::error::EvalError;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EgoState {
    pub centroid: [f64; 2],
    pub yaw: f64,
}

impl EgoState {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self {
            centroid: [x, y],
            yaw,
        }
    }
}

/// Logged and simulated ego states of a single scene, one entry per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDataset {
    recorded: Vec<EgoState>,
    simulated: Vec<EgoState>,
}

impl SceneDataset {
    pub fn new(recorded: Vec<EgoState>) -> Self {
        Self {
            simulated: recorded.clone(),
            recorded,
        }
    }

    pub fn recorded(&self) -> &[EgoState] {
        &self.recorded
    }

    pub fn simulated(&self) -> &[EgoState] {
        &self.simulated
    }

    pub fn num_frames(&self) -> usize {
        self.recorded.len()
    }
}

/// Snapshot of the scenes being rolled out.
///
/// Simulated ego states start as a copy of the log; in closed loop the
/// policy output for step `t` overwrites frame `t + 1`.
#[derive(Debug, Clone, Default)]
pub struct SimulationDataset {
    scenes: IndexMap<SceneId, SceneDataset>,
}

impl SimulationDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_scene(&mut self, scene_id: SceneId, recorded: Vec<EgoState>) {
        self.scenes.insert(scene_id, SceneDataset::new(recorded));
    }

    pub fn scene(&self, scene_id: SceneId) -> Result<&SceneDataset, EvalError> {
        self.scenes
            .get(&scene_id)
            .ok_or(EvalError::MissingScene(scene_id))
    }

    pub fn scene_ids(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.scenes.keys().copied()
    }

    pub fn num_frames(&self, scene_id: SceneId) -> Result<usize, EvalError> {
        self.scene(scene_id).map(SceneDataset::num_frames)
    }

    pub fn set_simulated_ego(
        &mut self,
        scene_id: SceneId,
        frame: usize,
        state: EgoState,
    ) -> Result<(), EvalError> {
        let scene = self
            .scenes
            .get_mut(&scene_id)
            .ok_or(EvalError::MissingScene(scene_id))?;
        let len = scene.simulated.len();
        let slot = scene
            .simulated
            .get_mut(frame)
            .ok_or(EvalError::FrameOutOfRange {
                scene_id,
                frame,
                len,
            })?;
        *slot = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_scene(frames: usize) -> Vec<EgoState> {
        (0..frames).map(|i| EgoState::new(i as f64, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_simulated_starts_as_recorded() {
        let mut dataset = SimulationDataset::new();
        dataset.insert_scene(3, straight_scene(5));
        let scene = dataset.scene(3).unwrap();
        assert_eq!(scene.recorded(), scene.simulated());
        assert_eq!(dataset.num_frames(3).unwrap(), 5);
    }

    #[test]
    fn test_set_simulated_ego_only_touches_simulated() {
        let mut dataset = SimulationDataset::new();
        dataset.insert_scene(0, straight_scene(4));
        dataset
            .set_simulated_ego(0, 2, EgoState::new(2.0, 1.0, 0.1))
            .unwrap();

        let scene = dataset.scene(0).unwrap();
        assert_eq!(scene.simulated()[2], EgoState::new(2.0, 1.0, 0.1));
        assert_eq!(scene.recorded()[2], EgoState::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_unknown_scene_and_frame() {
        let mut dataset = SimulationDataset::new();
        dataset.insert_scene(0, straight_scene(2));
        assert_eq!(dataset.scene(7).unwrap_err(), EvalError::MissingScene(7));
        assert_eq!(
            dataset
                .set_simulated_ego(0, 2, EgoState::default())
                .unwrap_err(),
            EvalError::FrameOutOfRange {
                scene_id: 0,
                frame: 2,
                len: 2
            }
        );
    }
}
