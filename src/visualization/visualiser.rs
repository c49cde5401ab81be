use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::frame_data::{get_frame_data, AgentsData, LanesData, PolygonsData};
use super::labels::filter_agents_by_labels;
use super::map_api::MapApi;
use super::scene_log::SceneLog;
use super::trajectories::{get_frame_trajectories, TrajectoryData};
use crate::config::VisualiserConfig;
use crate::error::VisualisationError;
use crate::simulation::SceneId;

/// Column data of one frame, ready to be handed to a plotting front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameVisualisation {
    pub lanes: LanesData,
    pub crosswalks: PolygonsData,
    pub ego: PolygonsData,
    pub agent: AgentsData,
    pub trajs: TrajectoryData,
    pub traj_ego: TrajectoryData,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneVisualisation {
    pub title: String,
    pub scene_index: SceneId,
    pub generated_at: DateTime<Utc>,
    pub frames: Vec<FrameVisualisation>,
}

impl SceneVisualisation {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), VisualisationError> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(writer, self)?;
        tracing::info!(
            "Saved {} frames of scene {} to {}",
            self.frames.len(),
            self.scene_index,
            path.as_ref().display()
        );
        Ok(())
    }
}

pub fn visualise_scene(
    scene: &SceneLog,
    scene_index: SceneId,
    map: &dyn MapApi,
    config: &VisualiserConfig,
) -> Result<SceneVisualisation, VisualisationError> {
    if scene.frames.is_empty() {
        return Err(VisualisationError::EmptyScene);
    }

    let mut frames = Vec::with_capacity(scene.frames.len());
    for (frame_index, frame) in scene.frames.iter().enumerate() {
        let agents = filter_agents_by_labels(&frame.agents, config.label_threshold);
        let data = get_frame_data(map, frame, &agents, &frame.tl_faces, config.map_radius_m)?;

        let track_ids: Vec<u64> = agents.iter().map(|agent| agent.track_id).collect();
        let (trajs, traj_ego) = get_frame_trajectories(
            &scene.frames,
            &track_ids,
            frame_index,
            config.agent_traj_length,
            config.ego_traj_length,
        );

        frames.push(FrameVisualisation {
            lanes: data.lanes,
            crosswalks: data.crosswalks,
            ego: data.ego,
            agent: data.agents,
            trajs,
            traj_ego,
        });
    }

    Ok(SceneVisualisation {
        title: format!("Scene {}", scene_index),
        scene_index,
        generated_at: Utc::now(),
        frames,
    })
}
