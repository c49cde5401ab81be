pub mod episode;
pub mod policy;
pub mod reward;

pub use episode::{EpisodeRunner, EpisodeSummary};
pub use policy::{NoisyTrackingPolicy, PerfectTrackingPolicy, TrackingPolicy};
pub use reward::{
    build_reward, ClosedLoopReward, ClosedLoopRewardBuilder, EgoInput, EgoOutput, OpenLoopReward,
    Reward, RewardInput,
};
