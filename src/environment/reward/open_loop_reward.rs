use super::base::Reward;
use super::reward_input::RewardInput;
use crate::error::RewardError;
use crate::evaluation::mean_squared_error;

/// Open-loop reward: negative mean squared error between the predicted and
/// the logged ego positions of the current step.
#[derive(Debug, Clone)]
pub struct OpenLoopReward {
    reward_prefix: String,
}

impl OpenLoopReward {
    pub fn new(reward_prefix: impl Into<String>) -> Self {
        Self {
            reward_prefix: reward_prefix.into(),
        }
    }
}

impl Default for OpenLoopReward {
    fn default() -> Self {
        Self::new("OLE")
    }
}

impl Reward for OpenLoopReward {
    fn reward_prefix(&self) -> &str {
        &self.reward_prefix
    }

    fn reset(&mut self) {}

    fn get_reward(&mut self, reward_input: &RewardInput<'_>) -> Result<f64, RewardError> {
        let penalty = mean_squared_error(
            &reward_input.ego_output.positions,
            &reward_input.ego_input.target_positions,
        )?;
        Ok(-penalty)
    }
}
