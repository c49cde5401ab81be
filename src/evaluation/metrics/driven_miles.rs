use ndarray::{s, Array1};

use super::SimulationMetric;
use crate::error::EvalError;
use crate::evaluation::error_functions::l2_error;
use crate::simulation::SimulationOutput;

pub const METERS_PER_MILE: f64 = 1609.34;

/// Distance covered by the simulated ego between consecutive frames, in miles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDrivenMilesMetric;

impl SimulatedDrivenMilesMetric {
    pub const NAME: &'static str = "simulated_driven_miles";
}

impl SimulationMetric for SimulatedDrivenMilesMetric {
    fn metric_name(&self) -> &'static str {
        Self::NAME
    }

    fn compute(&self, simulation_output: &SimulationOutput) -> Result<Array1<f64>, EvalError> {
        let centroids = &simulation_output.simulated_centroids;
        let frames = centroids.nrows();
        let mut miles = Array1::zeros(frames);
        if frames < 2 {
            return Ok(miles);
        }
        let steps = l2_error(&centroids.slice(s![1.., ..]), &centroids.slice(s![..-1, ..]))?;
        miles
            .slice_mut(s![1..])
            .assign(&steps.mapv(|meters| meters / METERS_PER_MILE));
        Ok(miles)
    }
}
