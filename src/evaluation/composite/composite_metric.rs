use indexmap::IndexMap;
use ndarray::Array1;

use crate::error::EvalError;
use crate::evaluation::validators::ValidatorOutput;
use crate::simulation::SimulationOutput;

/// A scene-level scalar built from the metric and validation results of the
/// same scene.
pub trait CompositeMetric: Send + Sync {
    fn composite_metric_name(&self) -> &str;

    fn compute(
        &self,
        metric_results: &IndexMap<String, Array1<f64>>,
        validation_results: &IndexMap<String, ValidatorOutput>,
        simulation_output: &SimulationOutput,
    ) -> Result<f64, EvalError>;
}
