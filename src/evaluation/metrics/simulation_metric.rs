use ndarray::Array1;

use crate::error::EvalError;
use crate::simulation::SimulationOutput;

/// A per-frame metric computed over one simulated scene.
pub trait SimulationMetric: Send + Sync {
    /// Key under which results are stored in the evaluator.
    fn metric_name(&self) -> &'static str;

    /// One value per evaluated frame.
    fn compute(&self, simulation_output: &SimulationOutput) -> Result<Array1<f64>, EvalError>;
}
