use ndarray::Array3;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use super::policy::TrackingPolicy;
use super::reward::{EgoInput, EgoOutput, Reward, RewardInput};
use crate::error::RewardError;
use crate::simulation::{
    AgentsInsOuts, EgoInsOuts, EgoState, SceneId, SimulationDataset, UnrollInputOutput,
};

const EGO_TRACK_ID: i64 = -1;

#[derive(Debug, Clone)]
pub struct EpisodeSummary {
    pub episode_id: Uuid,
    pub rewards: Vec<f64>,
    pub total_reward: f64,
    pub steps: usize,
    pub stopped_early: bool,
}

/// Steps a single scene through the gym loop, one reward per transition.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeRunner {
    scene_id: SceneId,
    closed_loop: bool,
}

impl EpisodeRunner {
    pub fn new(scene_id: SceneId) -> Self {
        Self {
            scene_id,
            closed_loop: true,
        }
    }

    /// Predictions are scored but never written back into the dataset.
    pub fn open_loop(mut self) -> Self {
        self.closed_loop = false;
        self
    }

    pub fn run(
        &self,
        reward: &mut dyn Reward,
        policy: &mut dyn TrackingPolicy,
        sim_dataset: &mut SimulationDataset,
    ) -> Result<EpisodeSummary, RewardError> {
        let episode_id = Uuid::new_v4();
        let span = info_span!("episode", %episode_id, scene_id = self.scene_id);
        let _guard = span.enter();

        let num_frames = sim_dataset.num_frames(self.scene_id)?;
        let scene_indices = [self.scene_id];
        let mut ego_ins_outs = EgoInsOuts::new();
        let mut agents_ins_outs = AgentsInsOuts::new();
        let mut rewards = Vec::with_capacity(num_frames.saturating_sub(1));
        let mut stopped_early = false;

        info!(
            "Starting {} episode over {} frames",
            reward.reward_prefix(),
            num_frames
        );
        reward.reset();

        // The last frame has no successor, so it is never a step.
        for frame_index in 0..num_frames.saturating_sub(1) {
            let scene = sim_dataset.scene(self.scene_id)?;
            let current = scene.simulated()[frame_index];
            let target = scene.recorded()[frame_index + 1];
            let predicted = policy.predict(&current, &target);

            if self.closed_loop {
                sim_dataset.set_simulated_ego(self.scene_id, frame_index + 1, predicted)?;
            }
            ego_ins_outs
                .entry(self.scene_id)
                .or_default()
                .push(UnrollInputOutput::single_step(
                    EGO_TRACK_ID,
                    &current,
                    &target,
                    &predicted,
                ));
            agents_ins_outs
                .entry(self.scene_id)
                .or_default()
                .push(Vec::new());

            let (ego_output, ego_input) = step_dicts(&predicted, &target);
            let reward_input = RewardInput {
                frame_index,
                scene_indices: &scene_indices,
                sim_dataset: &*sim_dataset,
                ego_ins_outs: &ego_ins_outs,
                agents_ins_outs: &agents_ins_outs,
                ego_output: &ego_output,
                ego_input: &ego_input,
            };
            rewards.push(reward.get_reward(&reward_input)?);

            if let (Some(stop_error), Some(stop_thresh)) =
                (reward.stop_error(), reward.stop_threshold())
            {
                if stop_error > stop_thresh {
                    warn!(
                        "Stopping episode at step {}: error {:.3} above threshold {:.3}",
                        frame_index, stop_error, stop_thresh
                    );
                    stopped_early = true;
                    break;
                }
            }
        }

        let total_reward: f64 = rewards.iter().sum();
        info!(
            "Episode finished after {} steps, total reward {:.3}",
            rewards.len(),
            total_reward
        );
        Ok(EpisodeSummary {
            episode_id,
            steps: rewards.len(),
            rewards,
            total_reward,
            stopped_early,
        })
    }
}

fn step_dicts(predicted: &EgoState, target: &EgoState) -> (EgoOutput, EgoInput) {
    let ego_output = EgoOutput {
        positions: Array3::from_shape_fn((1, 1, 2), |(_, _, k)| predicted.centroid[k]),
        yaws: Array3::from_elem((1, 1, 1), predicted.yaw),
    };
    let ego_input = EgoInput {
        target_positions: Array3::from_shape_fn((1, 1, 2), |(_, _, k)| target.centroid[k]),
        target_yaws: Array3::from_elem((1, 1, 1), target.yaw),
    };
    (ego_output, ego_input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::policy::PerfectTrackingPolicy;
    use crate::environment::reward::{ClosedLoopReward, OpenLoopReward};
    use approx::assert_abs_diff_eq;

    struct LateralOffsetPolicy(f64);

    impl TrackingPolicy for LateralOffsetPolicy {
        fn predict(&mut self, _current: &EgoState, target: &EgoState) -> EgoState {
            EgoState::new(target.centroid[0], target.centroid[1] + self.0, target.yaw)
        }
    }

    fn dataset(frames: usize) -> SimulationDataset {
        let mut dataset = SimulationDataset::new();
        dataset.insert_scene(
            0,
            (0..frames).map(|i| EgoState::new(i as f64, 0.0, 0.0)).collect(),
        );
        dataset
    }

    #[test]
    fn test_perfect_policy_scores_zero_every_step() {
        let mut sim_dataset = dataset(6);
        let mut reward = ClosedLoopReward::new();
        let summary = EpisodeRunner::new(0)
            .run(&mut reward, &mut PerfectTrackingPolicy, &mut sim_dataset)
            .unwrap();

        assert_eq!(summary.steps, 5);
        assert!(summary.rewards.iter().all(|&r| r == 0.0));
        assert!(!summary.stopped_early);
    }

    #[test]
    fn test_closed_loop_writes_predictions_back() {
        let mut sim_dataset = dataset(4);
        let mut reward = ClosedLoopReward::builder().yaw(false, 0.0).build();
        let summary = EpisodeRunner::new(0)
            .run(&mut reward, &mut LateralOffsetPolicy(2.0), &mut sim_dataset)
            .unwrap();

        assert_eq!(summary.steps, 3);
        for r in &summary.rewards {
            assert_abs_diff_eq!(*r, -2.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(summary.total_reward, -6.0, epsilon = 1e-12);
        let scene = sim_dataset.scene(0).unwrap();
        assert_eq!(scene.simulated()[0], scene.recorded()[0]);
        assert_eq!(scene.simulated()[3], EgoState::new(3.0, 2.0, 0.0));
    }

    #[test]
    fn test_stop_threshold_ends_episode_early() {
        let mut sim_dataset = dataset(10);
        let mut reward = ClosedLoopReward::builder().early_stop(true, 0.5).build();
        let summary = EpisodeRunner::new(0)
            .run(&mut reward, &mut LateralOffsetPolicy(1.0), &mut sim_dataset)
            .unwrap();

        assert!(summary.stopped_early);
        assert_eq!(summary.steps, 1);
    }

    #[test]
    fn test_open_loop_episode() {
        let mut sim_dataset = dataset(3);
        let mut reward = OpenLoopReward::default();
        let summary = EpisodeRunner::new(0)
            .open_loop()
            .run(&mut reward, &mut LateralOffsetPolicy(1.0), &mut sim_dataset)
            .unwrap();

        assert_eq!(summary.steps, 2);
        for r in &summary.rewards {
            assert_abs_diff_eq!(*r, -0.5, epsilon = 1e-12);
        }
        let scene = sim_dataset.scene(0).unwrap();
        assert_eq!(scene.simulated(), scene.recorded());
    }

    #[test]
    fn test_unknown_scene() {
        let mut sim_dataset = dataset(3);
        let mut reward = ClosedLoopReward::new();
        assert!(EpisodeRunner::new(4)
            .run(&mut reward, &mut PerfectTrackingPolicy, &mut sim_dataset)
            .is_err());
    }
}
