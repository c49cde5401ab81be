use ndarray::Array1;

use super::SimulationMetric;
use crate::error::EvalError;
use crate::evaluation::error_functions::l2_error;
use crate::simulation::SimulationOutput;

/// L2 distance between the simulated and the logged ego centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplacementErrorL2Metric;

impl DisplacementErrorL2Metric {
    pub const NAME: &'static str = "displacement_error_l2";
}

impl SimulationMetric for DisplacementErrorL2Metric {
    fn metric_name(&self) -> &'static str {
        Self::NAME
    }

    fn compute(&self, simulation_output: &SimulationOutput) -> Result<Array1<f64>, EvalError> {
        l2_error(
            &simulation_output.simulated_centroids,
            &simulation_output.recorded_centroids,
        )
    }
}
