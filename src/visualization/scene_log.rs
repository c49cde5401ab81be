use serde::{Deserialize, Serialize};

use crate::simulation::EgoState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FaceStatus {
    Active,
    Inactive,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficLightFace {
    pub face_id: String,
    pub status: FaceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub track_id: u64,
    pub centroid: [f64; 2],
    /// Length, width, height.
    pub extent: [f64; 3],
    pub yaw: f64,
    pub label_probabilities: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub ego_translation: [f64; 2],
    pub ego_yaw: f64,
    #[serde(default)]
    pub agents: Vec<AgentRecord>,
    #[serde(default)]
    pub tl_faces: Vec<TrafficLightFace>,
}

/// Logged frames of one scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneLog {
    pub frames: Vec<FrameRecord>,
}

impl SceneLog {
    /// Scene with only the ego, e.g. a simulated rollout.
    pub fn from_ego_states(states: &[EgoState]) -> Self {
        Self {
            frames: states
                .iter()
                .map(|state| FrameRecord {
                    ego_translation: state.centroid,
                    ego_yaw: state.yaw,
                    agents: Vec::new(),
                    tl_faces: Vec::new(),
                })
                .collect(),
        }
    }
}
