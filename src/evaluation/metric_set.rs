use super::evaluator::{ClosedLoopEvaluator, EvaluationPlan};
use super::metrics::{
    DisplacementErrorL2Metric, DistanceToRefTrajectoryMetric, SimulatedDrivenMilesMetric,
    YawErrorCAMetric,
};
use crate::error::EvalError;
use crate::simulation::SimulationOutput;

/// A stateful evaluator owned by a reward for the duration of an episode.
///
/// Steps must be evaluated in increasing order: results are looked up by
/// step index after every call to [`MetricSet::evaluate`].
pub trait MetricSet: Send {
    fn evaluate(&mut self, simulation_outputs: &[SimulationOutput]) -> Result<(), EvalError>;
    fn reset(&mut self);
    fn evaluator(&self) -> &ClosedLoopEvaluator;
}

/// Metrics used to compute the closed-loop gym reward: displacement error,
/// distance to the reference trajectory, driven miles and yaw error.
pub struct GymClosedLoopMetricSet {
    evaluator: ClosedLoopEvaluator,
}

impl GymClosedLoopMetricSet {
    pub fn new() -> Self {
        let plan = EvaluationPlan::new(
            vec![
                Box::new(DisplacementErrorL2Metric),
                Box::new(DistanceToRefTrajectoryMetric::default()),
                Box::new(SimulatedDrivenMilesMetric),
                Box::new(YawErrorCAMetric),
            ],
            vec![],
            vec![],
            vec![],
        );
        Self {
            evaluator: ClosedLoopEvaluator::new(plan),
        }
    }
}

impl Default for GymClosedLoopMetricSet {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSet for GymClosedLoopMetricSet {
    fn evaluate(&mut self, simulation_outputs: &[SimulationOutput]) -> Result<(), EvalError> {
        self.evaluator.evaluate(simulation_outputs)
    }

    fn reset(&mut self) {
        self.evaluator.reset();
    }

    fn evaluator(&self) -> &ClosedLoopEvaluator {
        &self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{EgoState, SimulationDataset};

    #[test]
    fn test_gym_metric_set_computes_default_metrics() {
        let mut dataset = SimulationDataset::new();
        dataset.insert_scene(0, vec![EgoState::default(); 3]);
        let output = SimulationOutput::new(0, &dataset).unwrap();

        let mut metric_set = GymClosedLoopMetricSet::new();
        metric_set.evaluate(&[output]).unwrap();
        let names: Vec<&str> = metric_set.evaluator().scene_metric_results()[&0usize]
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            names,
            vec![
                "displacement_error_l2",
                "distance_to_reference_trajectory",
                "simulated_driven_miles",
                "yaw_error_ca"
            ]
        );

        metric_set.reset();
        assert!(metric_set.evaluator().scene_metric_results().is_empty());
    }
}
