pub mod frame_data;
pub mod labels;
pub mod map_api;
pub mod scene_log;
pub mod trajectories;
pub mod visualiser;

pub use map_api::{InMemoryMap, MapApi};
pub use scene_log::SceneLog;
pub use visualiser::{visualise_scene, SceneVisualisation};
