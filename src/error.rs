use thiserror::Error;

use crate::simulation::SceneId;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Reward Error: {0}")]
    Reward(#[from] RewardError),
    #[error("Evaluation Error: {0}")]
    Evaluation(#[from] EvalError),
    #[error("Visualisation Error: {0}")]
    Visualisation(#[from] VisualisationError),
    #[error("Policy Error: {0}")]
    Policy(#[from] PolicyError),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

// Evaluation Error Type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
    #[error("Input is empty")]
    EmptyInput,
    #[error("Scene {0} is not part of the simulation dataset")]
    MissingScene(SceneId),
    #[error("Metric '{metric}' has no results for scene {scene_id}")]
    MissingMetric { scene_id: SceneId, metric: String },
    #[error("Step {step} is out of range for metric '{metric}' of scene {scene_id} (len {len})")]
    StepOutOfRange {
        scene_id: SceneId,
        metric: String,
        step: usize,
        len: usize,
    },
    #[error("Frame {frame} is out of range for scene {scene_id} (len {len})")]
    FrameOutOfRange {
        scene_id: SceneId,
        frame: usize,
        len: usize,
    },
    #[error("Scene fraction must be in (0, 1], got {0}")]
    InvalidSceneFraction(f64),
}

// Reward Error Type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RewardError {
    #[error("Closed loop reward supports exactly one scene per step, got {0}")]
    SceneCardinality(usize),
    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("Tracking noise must be a finite number of metres, got {0}")]
    InvalidNoise(f64),
}

#[derive(Error, Debug)]
pub enum VisualisationError {
    #[error("Failed to write visualisation: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialise visualisation: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Lane {0} is not part of the map")]
    MissingLane(String),
    #[error("Crosswalk {0} is not part of the map")]
    MissingCrosswalk(String),
    #[error("Scene has no frames")]
    EmptyScene,
}
