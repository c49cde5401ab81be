use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds of map elements, `bounds[i] = [[x_min, y_min], [x_max, y_max]]`
/// for the element `ids[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementBounds {
    pub ids: Vec<String>,
    pub bounds: Vec<[[f64; 2]; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrafficLightColor {
    Red,
    Green,
    Yellow,
    Unknown,
}

impl TrafficLightColor {
    pub fn hex(&self) -> Option<&'static str> {
        match self {
            TrafficLightColor::Green => Some("#33CC33"),
            TrafficLightColor::Red => Some("#FF3300"),
            TrafficLightColor::Yellow => Some("#FFFF66"),
            TrafficLightColor::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneCoords {
    pub left: Vec<[f64; 2]>,
    pub right: Vec<[f64; 2]>,
}

/// Read access to the semantic map used to draw a frame.
pub trait MapApi {
    fn lanes_bounds(&self) -> &ElementBounds;
    fn crosswalks_bounds(&self) -> &ElementBounds;
    fn lane_traffic_control_ids(&self, lane_id: &str) -> Vec<String>;
    fn color_for_face(&self, face_id: &str) -> TrafficLightColor;
    fn lane_coords(&self, lane_id: &str) -> Option<LaneCoords>;
    fn crosswalk_coords(&self, crosswalk_id: &str) -> Option<Vec<[f64; 2]>>;
}

/// Indices of the elements whose bounds intersect the square of side
/// `2 * half_extent` centred on `center`.
pub fn indices_in_bounds(center: [f64; 2], bounds: &[[[f64; 2]; 2]], half_extent: f64) -> Vec<usize> {
    bounds
        .iter()
        .enumerate()
        .filter(|(_, [min, max])| {
            center[0] > min[0] - half_extent
                && center[0] < max[0] + half_extent
                && center[1] > min[1] - half_extent
                && center[1] < max[1] + half_extent
        })
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLane {
    pub left: Vec<[f64; 2]>,
    pub right: Vec<[f64; 2]>,
    #[serde(default)]
    pub traffic_controls: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MapDocument {
    #[serde(default)]
    lanes: IndexMap<String, MapLane>,
    #[serde(default)]
    crosswalks: IndexMap<String, Vec<[f64; 2]>>,
    #[serde(default)]
    traffic_light_faces: IndexMap<String, TrafficLightColor>,
}

/// A map held entirely in memory, loadable from JSON.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMap {
    lanes: IndexMap<String, MapLane>,
    crosswalks: IndexMap<String, Vec<[f64; 2]>>,
    traffic_light_faces: IndexMap<String, TrafficLightColor>,
    lanes_bounds: ElementBounds,
    crosswalks_bounds: ElementBounds,
}

impl InMemoryMap {
    pub fn new(
        lanes: IndexMap<String, MapLane>,
        crosswalks: IndexMap<String, Vec<[f64; 2]>>,
        traffic_light_faces: IndexMap<String, TrafficLightColor>,
    ) -> Self {
        let lanes_bounds = ElementBounds {
            ids: lanes.keys().cloned().collect(),
            bounds: lanes
                .values()
                .map(|lane| bounding_box(lane.left.iter().chain(lane.right.iter())))
                .collect(),
        };
        let crosswalks_bounds = ElementBounds {
            ids: crosswalks.keys().cloned().collect(),
            bounds: crosswalks.values().map(|c| bounding_box(c.iter())).collect(),
        };
        Self {
            lanes,
            crosswalks,
            traffic_light_faces,
            lanes_bounds,
            crosswalks_bounds,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let document: MapDocument = serde_json::from_str(json)?;
        Ok(Self::new(
            document.lanes,
            document.crosswalks,
            document.traffic_light_faces,
        ))
    }
}

fn bounding_box<'a>(points: impl Iterator<Item = &'a [f64; 2]>) -> [[f64; 2]; 2] {
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in points {
        min = [min[0].min(p[0]), min[1].min(p[1])];
        max = [max[0].max(p[0]), max[1].max(p[1])];
    }
    [min, max]
}

impl MapApi for InMemoryMap {
    fn lanes_bounds(&self) -> &ElementBounds {
        &self.lanes_bounds
    }

    fn crosswalks_bounds(&self) -> &ElementBounds {
        &self.crosswalks_bounds
    }

    fn lane_traffic_control_ids(&self, lane_id: &str) -> Vec<String> {
        self.lanes
            .get(lane_id)
            .map(|lane| lane.traffic_controls.clone())
            .unwrap_or_default()
    }

    fn color_for_face(&self, face_id: &str) -> TrafficLightColor {
        self.traffic_light_faces
            .get(face_id)
            .copied()
            .unwrap_or(TrafficLightColor::Unknown)
    }

    fn lane_coords(&self, lane_id: &str) -> Option<LaneCoords> {
        self.lanes.get(lane_id).map(|lane| LaneCoords {
            left: lane.left.clone(),
            right: lane.right.clone(),
        })
    }

    fn crosswalk_coords(&self, crosswalk_id: &str) -> Option<Vec<[f64; 2]>> {
        self.crosswalks.get(crosswalk_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP_JSON: &str = r#"{
        "lanes": {
            "lane_a": {"left": [[0.0, 1.0], [100.0, 1.0]], "right": [[0.0, -1.0], [100.0, -1.0]], "traffic_controls": ["face_1"]},
            "lane_far": {"left": [[500.0, 1.0], [600.0, 1.0]], "right": [[500.0, -1.0], [600.0, -1.0]]}
        },
        "crosswalks": {"cw": [[10.0, -3.0], [12.0, -3.0], [12.0, 3.0], [10.0, 3.0]]},
        "traffic_light_faces": {"face_1": "GREEN"}
    }"#;

    #[test]
    fn test_map_from_json_computes_bounds() {
        let map = InMemoryMap::from_json(MAP_JSON).unwrap();
        assert_eq!(map.lanes_bounds().ids, vec!["lane_a", "lane_far"]);
        assert_eq!(map.lanes_bounds().bounds[0], [[0.0, -1.0], [100.0, 1.0]]);
        assert_eq!(map.crosswalks_bounds().bounds[0], [[10.0, -3.0], [12.0, 3.0]]);
        assert_eq!(map.lane_traffic_control_ids("lane_a"), vec!["face_1"]);
        assert!(map.lane_traffic_control_ids("lane_far").is_empty());
        assert_eq!(map.color_for_face("face_1"), TrafficLightColor::Green);
        assert_eq!(map.color_for_face("nope"), TrafficLightColor::Unknown);
    }

    #[test]
    fn test_indices_in_bounds() {
        let map = InMemoryMap::from_json(MAP_JSON).unwrap();
        assert_eq!(indices_in_bounds([50.0, 0.0], &map.lanes_bounds().bounds, 50.0), vec![0]);
        assert_eq!(indices_in_bounds([560.0, 0.0], &map.lanes_bounds().bounds, 50.0), vec![1]);
        assert!(indices_in_bounds([300.0, 0.0], &map.lanes_bounds().bounds, 50.0).is_empty());
        assert!(indices_in_bounds([50.0, 80.0], &map.lanes_bounds().bounds, 50.0).is_empty());
    }
}
