use crate::config::{RewardConfig, RewardKind};
use crate::error::RewardError;

use super::closed_loop_reward::ClosedLoopRewardBuilder;
use super::open_loop_reward::OpenLoopReward;
use super::reward_input::RewardInput;

/// Reward of the gym environment.
///
/// `reset` is called once at the start of every episode, then `get_reward`
/// once per step, in step order.
pub trait Reward: Send {
    /// Prefix identifying this reward.
    fn reward_prefix(&self) -> &str;

    fn reset(&mut self);

    fn get_reward(&mut self, reward_input: &RewardInput<'_>) -> Result<f64, RewardError>;

    /// Error the episode loop compares against [`Reward::stop_threshold`].
    fn stop_error(&self) -> Option<f64> {
        None
    }

    /// Threshold above which the episode should be terminated early, if
    /// early termination is enabled.
    fn stop_threshold(&self) -> Option<f64> {
        None
    }
}

pub fn build_reward(config: &RewardConfig) -> Box<dyn Reward> {
    match config.kind {
        RewardKind::ClosedLoop => Box::new(
            ClosedLoopRewardBuilder::new()
                .reward_prefix(config.prefix.clone())
                .clip(config.enable_clip, config.rew_clip_thresh)
                .yaw(config.use_yaw, config.yaw_weight)
                .early_stop(config.stop_flag, config.stop_thresh)
                .build(),
        ),
        RewardKind::OpenLoop => Box::new(OpenLoopReward::new(config.prefix.clone())),
    }
}
