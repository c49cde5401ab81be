use tracing::debug;

use super::base::Reward;
use super::reward_input::RewardInput;
use crate::error::RewardError;
use crate::evaluation::metrics::{DisplacementErrorL2Metric, YawErrorCAMetric};
use crate::evaluation::{GymClosedLoopMetricSet, MetricSet};
use crate::simulation::SimulationOutput;

/// Closed-loop reward: negative displacement error from the logged ego,
/// optionally clipped and penalised by the yaw error.
pub struct ClosedLoopReward<M: MetricSet = GymClosedLoopMetricSet> {
    reward_prefix: String,
    metric_set: M,
    enable_clip: bool,
    rew_clip_thresh: f64,
    use_yaw: bool,
    yaw_weight: f64,
    stop_flag: bool,
    stop_thresh: f64,
    stop_error: Option<f64>,
}

impl ClosedLoopReward {
    /// Reward with the default gym metric set and default parameters.
    pub fn new() -> Self {
        ClosedLoopRewardBuilder::new().build()
    }

    pub fn builder() -> ClosedLoopRewardBuilder {
        ClosedLoopRewardBuilder::new()
    }
}

impl Default for ClosedLoopReward {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MetricSet> ClosedLoopReward<M> {
    pub fn metric_set(&self) -> &M {
        &self.metric_set
    }
}

impl<M: MetricSet> Reward for ClosedLoopReward<M> {
    fn reward_prefix(&self) -> &str {
        &self.reward_prefix
    }

    fn reset(&mut self) {
        self.metric_set.reset();
        self.stop_error = None;
    }

    fn get_reward(&mut self, reward_input: &RewardInput<'_>) -> Result<f64, RewardError> {
        let scene_id = match reward_input.scene_indices {
            [scene_id] => *scene_id,
            scenes => return Err(RewardError::SceneCardinality(scenes.len())),
        };

        let simulated_output = SimulationOutput::new(scene_id, reward_input.sim_dataset)?;
        self.metric_set.evaluate(std::slice::from_ref(&simulated_output))?;

        // The reward of step t is the outcome of the transition into frame t + 1.
        let step = reward_input.frame_index + 1;
        let evaluator = self.metric_set.evaluator();
        let dist_error = evaluator.metric_value(scene_id, DisplacementErrorL2Metric::NAME, step)?;
        let yaw_error =
            self.yaw_weight * evaluator.metric_value(scene_id, YawErrorCAMetric::NAME, step)?.abs();

        let mut reward = -dist_error;
        if self.enable_clip {
            reward = reward.max(-self.rew_clip_thresh);
        }
        if self.use_yaw {
            reward -= yaw_error;
        }

        self.stop_error = Some(dist_error);

        debug!(
            "{} reward for scene {} step {}: dist_error={:.3}, yaw_error={:.3}, reward={:.3}",
            self.reward_prefix, scene_id, reward_input.frame_index, dist_error, yaw_error, reward
        );
        Ok(reward)
    }

    fn stop_error(&self) -> Option<f64> {
        self.stop_error
    }

    fn stop_threshold(&self) -> Option<f64> {
        self.stop_flag.then_some(self.stop_thresh)
    }
}

pub struct ClosedLoopRewardBuilder<M: MetricSet = GymClosedLoopMetricSet> {
    reward_prefix: String,
    metric_set: M,
    enable_clip: bool,
    rew_clip_thresh: f64,
    use_yaw: bool,
    yaw_weight: f64,
    stop_flag: bool,
    stop_thresh: f64,
}

impl ClosedLoopRewardBuilder {
    pub fn new() -> Self {
        Self {
            reward_prefix: "CLE".to_string(),
            metric_set: GymClosedLoopMetricSet::new(),
            enable_clip: true,
            rew_clip_thresh: 15.0,
            use_yaw: true,
            yaw_weight: 3.0,
            stop_flag: false,
            stop_thresh: 20.0,
        }
    }
}

impl Default for ClosedLoopRewardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MetricSet> ClosedLoopRewardBuilder<M> {
    // Replaces the default gym metric set.
    pub fn metric_set<N: MetricSet>(self, metric_set: N) -> ClosedLoopRewardBuilder<N> {
        ClosedLoopRewardBuilder {
            reward_prefix: self.reward_prefix,
            metric_set,
            enable_clip: self.enable_clip,
            rew_clip_thresh: self.rew_clip_thresh,
            use_yaw: self.use_yaw,
            yaw_weight: self.yaw_weight,
            stop_flag: self.stop_flag,
            stop_thresh: self.stop_thresh,
        }
    }

    pub fn reward_prefix(mut self, reward_prefix: impl Into<String>) -> Self {
        self.reward_prefix = reward_prefix.into();
        self
    }

    // Floors the reward at -rew_clip_thresh when enabled.
    pub fn clip(mut self, enable_clip: bool, rew_clip_thresh: f64) -> Self {
        self.enable_clip = enable_clip;
        self.rew_clip_thresh = rew_clip_thresh;
        self
    }

    // Subtracts yaw_weight * |yaw error| when enabled.
    pub fn yaw(mut self, use_yaw: bool, yaw_weight: f64) -> Self {
        self.use_yaw = use_yaw;
        self.yaw_weight = yaw_weight;
        self
    }

    pub fn early_stop(mut self, stop_flag: bool, stop_thresh: f64) -> Self {
        self.stop_flag = stop_flag;
        self.stop_thresh = stop_thresh;
        self
    }

    pub fn build(self) -> ClosedLoopReward<M> {
        ClosedLoopReward {
            reward_prefix: self.reward_prefix,
            metric_set: self.metric_set,
            enable_clip: self.enable_clip,
            rew_clip_thresh: self.rew_clip_thresh,
            use_yaw: self.use_yaw,
            yaw_weight: self.yaw_weight,
            stop_flag: self.stop_flag,
            stop_thresh: self.stop_thresh,
            stop_error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::reward::{EgoInput, EgoOutput};
    use crate::error::EvalError;
    use crate::simulation::{AgentsInsOuts, EgoInsOuts, EgoState, SceneId, SimulationDataset};
    use approx::assert_abs_diff_eq;
    use ndarray::Array3;

    struct Step {
        dataset: SimulationDataset,
        ego_ins_outs: EgoInsOuts,
        agents_ins_outs: AgentsInsOuts,
        ego_output: EgoOutput,
        ego_input: EgoInput,
    }

    impl Step {
        /// Straight logged drive along x; the simulated ego at frame 1 is
        /// shifted by `lateral` metres and rotated by `yaw`.
        fn new(lateral: f64, yaw: f64) -> Self {
            let mut dataset = SimulationDataset::new();
            dataset.insert_scene(0, (0..5).map(|i| EgoState::new(i as f64, 0.0, 0.0)).collect());
            dataset.insert_scene(1, (0..5).map(|i| EgoState::new(i as f64, 0.0, 0.0)).collect());
            dataset
                .set_simulated_ego(0, 1, EgoState::new(1.0, lateral, yaw))
                .unwrap();
            Self {
                dataset,
                ego_ins_outs: EgoInsOuts::new(),
                agents_ins_outs: AgentsInsOuts::new(),
                ego_output: EgoOutput {
                    positions: Array3::zeros((1, 1, 2)),
                    yaws: Array3::zeros((1, 1, 1)),
                },
                ego_input: EgoInput {
                    target_positions: Array3::zeros((1, 1, 2)),
                    target_yaws: Array3::zeros((1, 1, 1)),
                },
            }
        }

        fn input<'a>(&'a self, frame_index: usize, scene_indices: &'a [SceneId]) -> RewardInput<'a> {
            RewardInput {
                frame_index,
                scene_indices,
                sim_dataset: &self.dataset,
                ego_ins_outs: &self.ego_ins_outs,
                agents_ins_outs: &self.agents_ins_outs,
                ego_output: &self.ego_output,
                ego_input: &self.ego_input,
            }
        }
    }

    #[test]
    fn test_clipping_floors_displacement_reward() {
        let step = Step::new(20.0, 0.0);
        let mut reward = ClosedLoopReward::builder()
            .clip(true, 15.0)
            .yaw(false, 3.0)
            .build();
        reward.reset();

        let value = reward.get_reward(&step.input(0, &[0])).unwrap();
        assert_eq!(value, -15.0);
        assert_abs_diff_eq!(reward.stop_error().unwrap(), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_without_clip_or_yaw_reward_is_negative_error() {
        let step = Step::new(20.0, 0.4);
        let mut reward = ClosedLoopReward::builder()
            .clip(false, 15.0)
            .yaw(false, 3.0)
            .build();
        reward.reset();

        let value = reward.get_reward(&step.input(0, &[0])).unwrap();
        assert_abs_diff_eq!(value, -20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_yaw_penalty_is_weighted() {
        let step = Step::new(2.0, -0.5);
        let mut reward = ClosedLoopReward::builder().yaw(true, 3.0).build();
        reward.reset();

        let value = reward.get_reward(&step.input(0, &[0])).unwrap();
        assert_abs_diff_eq!(value, -2.0 - 3.0 * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_reads_metrics_of_next_frame() {
        let step = Step::new(4.0, 0.0);
        let mut reward = ClosedLoopReward::new();
        reward.reset();

        // Frame 2 was never perturbed.
        assert_eq!(reward.get_reward(&step.input(1, &[0])).unwrap(), 0.0);
        assert_eq!(reward.stop_error(), Some(0.0));
    }

    #[test]
    fn test_multiple_scenes_are_rejected() {
        let step = Step::new(1.0, 0.0);
        let mut reward = ClosedLoopReward::new();
        reward.reset();

        assert_eq!(
            reward.get_reward(&step.input(0, &[0, 1])).unwrap_err(),
            RewardError::SceneCardinality(2)
        );
        assert_eq!(
            reward.get_reward(&step.input(0, &[])).unwrap_err(),
            RewardError::SceneCardinality(0)
        );
    }

    #[test]
    fn test_last_frame_lookup_fails() {
        let step = Step::new(1.0, 0.0);
        let mut reward = ClosedLoopReward::new();
        reward.reset();

        assert!(matches!(
            reward.get_reward(&step.input(4, &[0])),
            Err(RewardError::Evaluation(EvalError::StepOutOfRange { step: 5, len: 5, .. }))
        ));
    }

    #[test]
    fn test_reset_clears_episode_state() {
        let step = Step::new(3.0, 0.0);
        let mut reward = ClosedLoopReward::new();
        reward.reset();
        reward.get_reward(&step.input(0, &[0])).unwrap();
        assert!(!reward.metric_set().evaluator().scene_metric_results().is_empty());

        reward.reset();
        assert!(reward.metric_set().evaluator().scene_metric_results().is_empty());
        assert_eq!(reward.stop_error(), None);
    }

    #[test]
    fn test_custom_metric_set_missing_yaw_metric_fails() {
        use crate::evaluation::{ClosedLoopEvaluator, EvaluationPlan};

        struct DisplacementOnly(ClosedLoopEvaluator);

        impl MetricSet for DisplacementOnly {
            fn evaluate(&mut self, outputs: &[SimulationOutput]) -> Result<(), EvalError> {
                self.0.evaluate(outputs)
            }
            fn reset(&mut self) {
                self.0.reset()
            }
            fn evaluator(&self) -> &ClosedLoopEvaluator {
                &self.0
            }
        }

        let step = Step::new(3.0, 0.0);
        let metric_set = DisplacementOnly(ClosedLoopEvaluator::new(EvaluationPlan::new(
            vec![Box::new(DisplacementErrorL2Metric)],
            vec![],
            vec![],
            vec![],
        )));
        let mut reward = ClosedLoopReward::builder()
            .metric_set(metric_set)
            .yaw(false, 0.0)
            .build();
        reward.reset();

        assert!(matches!(
            reward.get_reward(&step.input(0, &[0])),
            Err(RewardError::Evaluation(EvalError::MissingMetric { .. }))
        ));
    }

    #[test]
    fn test_stop_threshold_only_when_enabled() {
        assert_eq!(ClosedLoopReward::new().stop_threshold(), None);
        let reward = ClosedLoopReward::builder().early_stop(true, 12.0).build();
        assert_eq!(reward.stop_threshold(), Some(12.0));
    }
}
