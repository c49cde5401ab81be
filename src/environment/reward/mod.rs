pub mod base;
pub mod closed_loop_reward;
pub mod open_loop_reward;
pub mod reward_input;

pub use base::{build_reward, Reward};
pub use closed_loop_reward::{ClosedLoopReward, ClosedLoopRewardBuilder};
pub use open_loop_reward::OpenLoopReward;
pub use reward_input::{EgoInput, EgoOutput, RewardInput};
