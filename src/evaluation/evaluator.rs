use indexmap::IndexMap;
use ndarray::Array1;

use super::composite::CompositeMetric;
use super::metrics::SimulationMetric;
use super::validators::{SimulationValidator, ValidatorOutput};
use crate::error::EvalError;
use crate::simulation::{SceneId, SimulationOutput};

pub type SceneMetricResults = IndexMap<SceneId, IndexMap<String, Array1<f64>>>;
pub type SceneValidationResults = IndexMap<SceneId, IndexMap<String, ValidatorOutput>>;
pub type SceneCompositeMetricResults = IndexMap<SceneId, IndexMap<String, f64>>;

/// What the evaluator computes for every scene: metrics first, then
/// validators over those metrics, then composite metrics over both.
#[derive(Default)]
pub struct EvaluationPlan {
    metrics: Vec<Box<dyn SimulationMetric>>,
    validators: Vec<Box<dyn SimulationValidator>>,
    composite_metrics: Vec<Box<dyn CompositeMetric>>,
    intervention_validators: Vec<String>,
}

impl EvaluationPlan {
    pub fn new(
        metrics: Vec<Box<dyn SimulationMetric>>,
        validators: Vec<Box<dyn SimulationValidator>>,
        composite_metrics: Vec<Box<dyn CompositeMetric>>,
        intervention_validators: Vec<String>,
    ) -> Self {
        Self {
            metrics,
            validators,
            composite_metrics,
            intervention_validators,
        }
    }

    pub fn metric_names(&self) -> Vec<&'static str> {
        self.metrics.iter().map(|m| m.metric_name()).collect()
    }

    pub fn validator_names(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.validator_name()).collect()
    }

    pub fn intervention_validators(&self) -> &[String] {
        &self.intervention_validators
    }
}

/// Evaluates simulated scenes and accumulates per-scene results until
/// [`ClosedLoopEvaluator::reset`] is called.
///
/// Evaluating a scene again replaces its previous results.
#[derive(Default)]
pub struct ClosedLoopEvaluator {
    plan: EvaluationPlan,
    scene_metric_results: SceneMetricResults,
    scene_validation_results: SceneValidationResults,
    scene_composite_metric_results: SceneCompositeMetricResults,
}

impl ClosedLoopEvaluator {
    pub fn new(plan: EvaluationPlan) -> Self {
        Self {
            plan,
            scene_metric_results: IndexMap::new(),
            scene_validation_results: IndexMap::new(),
            scene_composite_metric_results: IndexMap::new(),
        }
    }

    pub fn plan(&self) -> &EvaluationPlan {
        &self.plan
    }

    pub fn evaluate(&mut self, simulation_outputs: &[SimulationOutput]) -> Result<(), EvalError> {
        for output in simulation_outputs {
            let mut metric_results = IndexMap::with_capacity(self.plan.metrics.len());
            for metric in &self.plan.metrics {
                metric_results.insert(metric.metric_name().to_string(), metric.compute(output)?);
            }

            let mut validation_results = IndexMap::with_capacity(self.plan.validators.len());
            for validator in &self.plan.validators {
                let result = validator.validate(&metric_results, output)?;
                validation_results.insert(validator.validator_name().to_string(), result);
            }

            let mut composite_results = IndexMap::with_capacity(self.plan.composite_metrics.len());
            for composite in &self.plan.composite_metrics {
                let value = composite.compute(&metric_results, &validation_results, output)?;
                composite_results.insert(composite.composite_metric_name().to_string(), value);
            }

            tracing::trace!(
                "Evaluated scene {}: {} metrics, {} validators, {} composite metrics",
                output.scene_id,
                metric_results.len(),
                validation_results.len(),
                composite_results.len()
            );

            self.scene_metric_results.insert(output.scene_id, metric_results);
            self.scene_validation_results.insert(output.scene_id, validation_results);
            self.scene_composite_metric_results
                .insert(output.scene_id, composite_results);
        }
        Ok(())
    }

    pub fn scene_metric_results(&self) -> &SceneMetricResults {
        &self.scene_metric_results
    }

    pub fn validation_results(&self) -> &SceneValidationResults {
        &self.scene_validation_results
    }

    pub fn composite_metric_results(&self) -> &SceneCompositeMetricResults {
        &self.scene_composite_metric_results
    }

    /// Full time series of one metric for one scene.
    pub fn metric_series(&self, scene_id: SceneId, metric: &str) -> Result<&Array1<f64>, EvalError> {
        self.scene_metric_results
            .get(&scene_id)
            .ok_or(EvalError::MissingScene(scene_id))?
            .get(metric)
            .ok_or_else(|| EvalError::MissingMetric {
                scene_id,
                metric: metric.to_string(),
            })
    }

    /// Value of one metric at one step, without any bounds clamping.
    pub fn metric_value(&self, scene_id: SceneId, metric: &str, step: usize) -> Result<f64, EvalError> {
        let series = self.metric_series(scene_id, metric)?;
        series
            .get(step)
            .copied()
            .ok_or_else(|| EvalError::StepOutOfRange {
                scene_id,
                metric: metric.to_string(),
                step,
                len: series.len(),
            })
    }

    pub fn reset(&mut self) {
        self.scene_metric_results.clear();
        self.scene_validation_results.clear();
        self.scene_composite_metric_results.clear();
    }
}
