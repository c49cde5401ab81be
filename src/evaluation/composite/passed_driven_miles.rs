use indexmap::IndexMap;
use ndarray::{s, Array1};

use super::CompositeMetric;
use crate::error::EvalError;
use crate::evaluation::metrics::SimulatedDrivenMilesMetric;
use crate::evaluation::validators::ValidatorOutput;
use crate::simulation::SimulationOutput;

/// Miles driven before the first frame failed by any of the intervention
/// validators (the whole scene when none failed).
#[derive(Debug, Clone)]
pub struct PassedDrivenMilesCompositeMetric {
    name: String,
    intervention_validators: Vec<String>,
}

impl PassedDrivenMilesCompositeMetric {
    pub fn new(name: impl Into<String>, intervention_validators: Vec<String>) -> Self {
        Self {
            name: name.into(),
            intervention_validators,
        }
    }
}

impl CompositeMetric for PassedDrivenMilesCompositeMetric {
    fn composite_metric_name(&self) -> &str {
        &self.name
    }

    fn compute(
        &self,
        metric_results: &IndexMap<String, Array1<f64>>,
        validation_results: &IndexMap<String, ValidatorOutput>,
        simulation_output: &SimulationOutput,
    ) -> Result<f64, EvalError> {
        let driven_miles = metric_results
            .get(SimulatedDrivenMilesMetric::NAME)
            .ok_or_else(|| EvalError::MissingMetric {
                scene_id: simulation_output.scene_id,
                metric: SimulatedDrivenMilesMetric::NAME.to_string(),
            })?;

        let first_intervention = self
            .intervention_validators
            .iter()
            .filter_map(|name| validation_results.get(name))
            .filter_map(|output| output.failed_frames.iter().min().copied())
            .min()
            .unwrap_or(driven_miles.len())
            .min(driven_miles.len());

        Ok(driven_miles.slice(s![..first_intervention]).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{EgoState, SimulationDataset};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn inputs() -> (IndexMap<String, Array1<f64>>, SimulationOutput) {
        let mut dataset = SimulationDataset::new();
        dataset.insert_scene(2, vec![EgoState::default(); 4]);
        let output = SimulationOutput::new(2, &dataset).unwrap();
        let mut metrics = IndexMap::new();
        metrics.insert(
            SimulatedDrivenMilesMetric::NAME.to_string(),
            array![0.0, 1.0, 2.0, 4.0],
        );
        (metrics, output)
    }

    #[test]
    fn test_counts_miles_until_first_intervention() {
        let (metrics, output) = inputs();
        let mut validation = IndexMap::new();
        validation.insert(
            "collision".to_string(),
            ValidatorOutput {
                is_valid_scene: false,
                failed_frames: vec![3],
            },
        );
        validation.insert(
            "off_road".to_string(),
            ValidatorOutput {
                is_valid_scene: false,
                failed_frames: vec![2, 3],
            },
        );
        validation.insert(
            "comfort".to_string(),
            ValidatorOutput {
                is_valid_scene: false,
                failed_frames: vec![0],
            },
        );

        let metric = PassedDrivenMilesCompositeMetric::new(
            "passed_driven_miles",
            vec!["collision".to_string(), "off_road".to_string()],
        );
        let miles = metric.compute(&metrics, &validation, &output).unwrap();
        assert_abs_diff_eq!(miles, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_whole_scene_without_interventions() {
        let (metrics, output) = inputs();
        let metric = PassedDrivenMilesCompositeMetric::new("passed_driven_miles", vec![]);
        let miles = metric.compute(&metrics, &IndexMap::new(), &output).unwrap();
        assert_abs_diff_eq!(miles, 7.0, epsilon = 1e-12);
    }
}
