use std::collections::HashSet;

use serde::Serialize;

use super::labels::{best_label, label_color};
use super::map_api::{indices_in_bounds, MapApi};
use super::scene_log::{AgentRecord, FaceStatus, FrameRecord, TrafficLightFace};
use crate::error::VisualisationError;

pub const EGO_EXTENT: [f64; 3] = [4.869795, 1.852291, 1.7];
const LANE_COLOR: &str = "gray";

/// Polygons as parallel x / y columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolygonsData {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LanesData {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub color: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentsData {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub id: Vec<u64>,
    pub name: Vec<String>,
    pub p: Vec<f32>,
    pub color: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameData {
    pub lanes: LanesData,
    pub crosswalks: PolygonsData,
    pub ego: PolygonsData,
    pub agents: AgentsData,
}

/// Corners of an oriented box, clockwise from the rear right.
pub fn box_corners(centroid: [f64; 2], extent: [f64; 3], yaw: f64) -> [[f64; 2]; 4] {
    let (s, c) = yaw.sin_cos();
    let half = [extent[0] * 0.5, extent[1] * 0.5];
    [[-1.0, -1.0], [-1.0, 1.0], [1.0, 1.0], [1.0, -1.0]].map(|[sx, sy]| {
        let x = sx * half[0];
        let y = sy * half[1];
        [centroid[0] + x * c - y * s, centroid[1] + x * s + y * c]
    })
}

fn split_xy(points: impl IntoIterator<Item = [f64; 2]>) -> (Vec<f64>, Vec<f64>) {
    points.into_iter().map(|[x, y]| (x, y)).unzip()
}

/// Everything drawn for one frame: lanes and crosswalks within `radius` of
/// the ego, the ego box and the agent boxes.
pub fn get_frame_data(
    map: &dyn MapApi,
    frame: &FrameRecord,
    agents: &[AgentRecord],
    tl_faces: &[TrafficLightFace],
    radius: f64,
) -> Result<FrameData, VisualisationError> {
    let ego_xy = frame.ego_translation;
    let active_faces: HashSet<&str> = tl_faces
        .iter()
        .filter(|face| face.status == FaceStatus::Active)
        .map(|face| face.face_id.as_str())
        .collect();

    let mut lanes = LanesData::default();
    let lanes_bounds = map.lanes_bounds();
    for idx in indices_in_bounds(ego_xy, &lanes_bounds.bounds, radius) {
        let lane_id = lanes_bounds
            .ids
            .get(idx)
            .ok_or_else(|| VisualisationError::MissingLane(format!("#{idx}")))?;
        let coords = map
            .lane_coords(lane_id)
            .ok_or_else(|| VisualisationError::MissingLane(lane_id.clone()))?;

        let color = map
            .lane_traffic_control_ids(lane_id)
            .iter()
            .filter(|id| active_faces.contains(id.as_str()))
            .filter_map(|id| map.color_for_face(id).hex())
            .last()
            .unwrap_or(LANE_COLOR);

        let (x, y) = split_xy(coords.left.iter().chain(coords.right.iter().rev()).copied());
        lanes.x.push(x);
        lanes.y.push(y);
        lanes.color.push(color.to_string());
    }

    let mut crosswalks = PolygonsData::default();
    let crosswalks_bounds = map.crosswalks_bounds();
    for idx in indices_in_bounds(ego_xy, &crosswalks_bounds.bounds, radius) {
        let crosswalk_id = crosswalks_bounds
            .ids
            .get(idx)
            .ok_or_else(|| VisualisationError::MissingCrosswalk(format!("#{idx}")))?;
        let coords = map
            .crosswalk_coords(crosswalk_id)
            .ok_or_else(|| VisualisationError::MissingCrosswalk(crosswalk_id.clone()))?;
        let (x, y) = split_xy(coords);
        crosswalks.x.push(x);
        crosswalks.y.push(y);
    }

    let (x, y) = split_xy(box_corners(ego_xy, EGO_EXTENT, frame.ego_yaw));
    let ego = PolygonsData {
        x: vec![x],
        y: vec![y],
    };

    let mut agents_data = AgentsData::default();
    for agent in agents {
        let (x, y) = split_xy(box_corners(agent.centroid, agent.extent, agent.yaw));
        let (name, p) = best_label(&agent.label_probabilities);
        agents_data.x.push(x);
        agents_data.y.push(y);
        agents_data.id.push(agent.track_id);
        agents_data.name.push(name.to_string());
        agents_data.p.push(p);
        agents_data.color.push(label_color(name).to_string());
    }

    Ok(FrameData {
        lanes,
        crosswalks,
        ego,
        agents: agents_data,
    })
}
