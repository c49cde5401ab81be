use ndarray::Array1;

use super::SimulationMetric;
use crate::error::EvalError;
use crate::evaluation::error_functions::closest_angle;
use crate::simulation::SimulationOutput;

/// Closest-angle yaw difference between the simulated and the logged ego.
#[derive(Debug, Clone, Copy, Default)]
pub struct YawErrorCAMetric;

impl YawErrorCAMetric {
    pub const NAME: &'static str = "yaw_error_ca";
}

impl SimulationMetric for YawErrorCAMetric {
    fn metric_name(&self) -> &'static str {
        Self::NAME
    }

    fn compute(&self, simulation_output: &SimulationOutput) -> Result<Array1<f64>, EvalError> {
        closest_angle(
            &simulation_output.recorded_yaws,
            &simulation_output.simulated_yaws,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{EgoState, SimulationDataset};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_yaw_error_wraps_around() {
        let mut dataset = SimulationDataset::new();
        dataset.insert_scene(
            0,
            vec![EgoState::new(0.0, 0.0, PI - 0.05), EgoState::new(1.0, 0.0, 0.0)],
        );
        dataset
            .set_simulated_ego(0, 0, EgoState::new(0.0, 0.0, -PI + 0.05))
            .unwrap();
        let output = SimulationOutput::new(0, &dataset).unwrap();

        let errors = YawErrorCAMetric.compute(&output).unwrap();
        assert_abs_diff_eq!(errors[0], 0.1, epsilon = 1e-9);
        assert_eq!(errors[1], 0.0);
    }
}
