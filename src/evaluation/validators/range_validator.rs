use indexmap::IndexMap;
use ndarray::Array1;

use super::{SimulationValidator, ValidatorOutput};
use crate::error::EvalError;
use crate::simulation::SimulationOutput;

/// How out-of-range frames are counted against `violation_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationMode {
    /// All out-of-range frames of the scene.
    #[default]
    Total,
    /// The longest run of consecutive out-of-range frames.
    Continuous,
}

/// Fails a scene when a metric leaves `[min_value, max_value]` for more than
/// `violation_duration` frames.
#[derive(Debug, Clone)]
pub struct RangeValidator {
    name: String,
    metric_name: String,
    min_value: f64,
    max_value: f64,
    violation_duration: usize,
    duration_mode: DurationMode,
}

impl RangeValidator {
    pub fn new(name: impl Into<String>, metric_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metric_name: metric_name.into(),
            min_value: f64::NEG_INFINITY,
            max_value: f64::INFINITY,
            violation_duration: 0,
            duration_mode: DurationMode::Total,
        }
    }

    pub fn min_value(mut self, min_value: f64) -> Self {
        self.min_value = min_value;
        self
    }

    pub fn max_value(mut self, max_value: f64) -> Self {
        self.max_value = max_value;
        self
    }

    pub fn violation_duration(mut self, frames: usize) -> Self {
        self.violation_duration = frames;
        self
    }

    pub fn duration_mode(mut self, duration_mode: DurationMode) -> Self {
        self.duration_mode = duration_mode;
        self
    }

    fn violation_length(&self, violating: &[usize]) -> usize {
        match self.duration_mode {
            DurationMode::Total => violating.len(),
            DurationMode::Continuous => {
                let mut longest = 0;
                let mut run = 0;
                let mut previous: Option<usize> = None;
                for &frame in violating {
                    run = match previous {
                        Some(p) if p + 1 == frame => run + 1,
                        _ => 1,
                    };
                    longest = longest.max(run);
                    previous = Some(frame);
                }
                longest
            }
        }
    }
}

impl SimulationValidator for RangeValidator {
    fn validator_name(&self) -> &str {
        &self.name
    }

    fn validate(
        &self,
        metric_results: &IndexMap<String, Array1<f64>>,
        simulation_output: &SimulationOutput,
    ) -> Result<ValidatorOutput, EvalError> {
        let values = metric_results
            .get(&self.metric_name)
            .ok_or_else(|| EvalError::MissingMetric {
                scene_id: simulation_output.scene_id,
                metric: self.metric_name.clone(),
            })?;

        let violating: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v < self.min_value || v > self.max_value)
            .map(|(frame, _)| frame)
            .collect();

        if self.violation_length(&violating) > self.violation_duration {
            Ok(ValidatorOutput {
                is_valid_scene: false,
                failed_frames: violating,
            })
        } else {
            Ok(ValidatorOutput::valid())
        }
    }
}
