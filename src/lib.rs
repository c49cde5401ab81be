pub mod config;
pub mod environment;
pub mod error;
pub mod evaluation;
pub mod simulation;
pub mod visualization;

pub use error::{AppError, EvalError, PolicyError, RewardError, VisualisationError};

pub use environment::{ClosedLoopReward, OpenLoopReward, Reward, RewardInput};
pub use evaluation::{aggregate_metrics, get_evaluator, ClosedLoopEvaluator};
