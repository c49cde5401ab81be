pub mod cle_utils;
pub mod composite;
pub mod error_functions;
pub mod evaluator;
pub mod metric_set;
pub mod metrics;
pub mod validators;

pub use cle_utils::{aggregate_metrics, aggregate_metrics_to, get_evaluator};
pub use error_functions::{closest_angle, l2_error, mean_squared_error};
pub use evaluator::{ClosedLoopEvaluator, EvaluationPlan};
pub use metric_set::{GymClosedLoopMetricSet, MetricSet};
