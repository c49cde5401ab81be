use indexmap::IndexMap;
use ndarray::Array1;

use crate::error::EvalError;
use crate::simulation::SimulationOutput;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatorOutput {
    pub is_valid_scene: bool,
    /// Frames that made the scene invalid; empty for a valid scene.
    pub failed_frames: Vec<usize>,
}

impl ValidatorOutput {
    pub fn valid() -> Self {
        Self {
            is_valid_scene: true,
            failed_frames: Vec::new(),
        }
    }
}

/// Decides whether a scene passes, based on the metrics already computed
/// for it.
pub trait SimulationValidator: Send + Sync {
    fn validator_name(&self) -> &str;

    fn validate(
        &self,
        metric_results: &IndexMap<String, Array1<f64>>,
        simulation_output: &SimulationOutput,
    ) -> Result<ValidatorOutput, EvalError>;
}
