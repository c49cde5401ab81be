use serde::Serialize;

use super::scene_log::FrameRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrajectoryData {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
}

impl TrajectoryData {
    fn push(&mut self, points: Vec<[f64; 2]>) {
        let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().map(|[x, y]| (x, y)).unzip();
        self.x.push(x);
        self.y.push(y);
    }
}

/// Future positions, in world coordinates, of the given agents (over
/// `agent_traj_length` frames) and of the ego (over `ego_traj_length`
/// frames), starting at `frame_index`. Frames where an agent is missing are
/// skipped.
pub fn get_frame_trajectories(
    frames: &[FrameRecord],
    track_ids: &[u64],
    frame_index: usize,
    agent_traj_length: usize,
    ego_traj_length: usize,
) -> (TrajectoryData, TrajectoryData) {
    let mut traj_agents = TrajectoryData::default();
    for &track_id in track_ids {
        let points = window(frames, frame_index, agent_traj_length)
            .iter()
            .filter_map(|frame| {
                frame
                    .agents
                    .iter()
                    .find(|agent| agent.track_id == track_id)
                    .map(|agent| agent.centroid)
            })
            .collect();
        traj_agents.push(points);
    }

    let mut traj_ego = TrajectoryData::default();
    traj_ego.push(
        window(frames, frame_index, ego_traj_length)
            .iter()
            .map(|frame| frame.ego_translation)
            .collect(),
    );

    (traj_agents, traj_ego)
}

fn window(frames: &[FrameRecord], frame_index: usize, length: usize) -> &[FrameRecord] {
    let start = frame_index.min(frames.len());
    let end = frame_index.saturating_add(length).min(frames.len());
    &frames[start..end]
}
