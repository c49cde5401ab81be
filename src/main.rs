use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};

use drive_gym_eval::config::{Configuration, EpisodeConfig, RewardKind};
use drive_gym_eval::environment::{build_reward, EpisodeRunner, NoisyTrackingPolicy};
use drive_gym_eval::error::AppError;
use drive_gym_eval::evaluation::metrics::DisplacementErrorL2Metric;
use drive_gym_eval::evaluation::{aggregate_metrics, get_evaluator};
use drive_gym_eval::simulation::{EgoState, SceneId, SimulationDataset, SimulationOutput};
use drive_gym_eval::visualization::map_api::MapLane;
use drive_gym_eval::visualization::{visualise_scene, InMemoryMap, SceneLog};

const SCENE_ID: SceneId = 0;
const LANE_HALF_WIDTH_M: f64 = 1.8;
const FRAMES_PER_LANE: usize = 10;

fn init_logging(level: &str) {
    let level = Level::from_str(level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

// A gentle S-curve driven at constant speed.
fn recorded_drive(episode: &EpisodeConfig) -> Vec<EgoState> {
    const AMPLITUDE_M: f64 = 3.0;
    const WAVELENGTH_M: f64 = 60.0;
    (0..episode.num_frames)
        .map(|frame| {
            let x = episode.speed_mps * episode.frame_dt_s * frame as f64;
            let phase = x / WAVELENGTH_M * std::f64::consts::TAU;
            let slope = AMPLITUDE_M * std::f64::consts::TAU / WAVELENGTH_M * phase.cos();
            EgoState::new(x, AMPLITUDE_M * phase.sin(), slope.atan())
        })
        .collect()
}

// Lanes following the logged drive, one per block of frames.
fn lanes_along(states: &[EgoState]) -> InMemoryMap {
    let lanes: IndexMap<String, MapLane> = states
        .chunks(FRAMES_PER_LANE)
        .filter(|chunk| chunk.len() > 1)
        .enumerate()
        .map(|(i, chunk)| {
            let offset = |sign: f64| -> Vec<[f64; 2]> {
                chunk
                    .iter()
                    .map(|s| [s.centroid[0], s.centroid[1] + sign * LANE_HALF_WIDTH_M])
                    .collect()
            };
            let lane = MapLane {
                left: offset(1.0),
                right: offset(-1.0),
                traffic_controls: Vec::new(),
            };
            (format!("lane_{}", i), lane)
        })
        .collect();
    InMemoryMap::new(lanes, IndexMap::new(), IndexMap::new())
}

fn main() -> Result<(), AppError> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let configuration = Configuration::load(config_path.as_deref())?;
    init_logging(&configuration.log_level);

    let recorded = recorded_drive(&configuration.episode);
    let map = lanes_along(&recorded);
    let mut sim_dataset = SimulationDataset::new();
    sim_dataset.insert_scene(SCENE_ID, recorded);

    let mut reward = build_reward(&configuration.reward);
    let mut policy = NoisyTrackingPolicy::new(
        StdRng::seed_from_u64(configuration.episode.seed),
        configuration.episode.noise_m,
    )?;
    let runner = match configuration.reward.kind {
        RewardKind::ClosedLoop => EpisodeRunner::new(SCENE_ID),
        RewardKind::OpenLoop => EpisodeRunner::new(SCENE_ID).open_loop(),
    };
    let summary = runner.run(reward.as_mut(), &mut policy, &mut sim_dataset)?;
    info!(
        "Episode {}: {} steps, total reward {:.3}, stopped early: {}",
        summary.episode_id, summary.steps, summary.total_reward, summary.stopped_early
    );

    let mut evaluator = get_evaluator();
    let output = SimulationOutput::new(SCENE_ID, &sim_dataset)?;
    evaluator.evaluate(&[output])?;
    let displacement = evaluator.metric_series(SCENE_ID, DisplacementErrorL2Metric::NAME)?;
    info!(
        "Mean displacement error {:.3} m over {} frames",
        displacement.mean().unwrap_or(0.0),
        displacement.len()
    );
    aggregate_metrics(&mut evaluator)?;

    let scene_log = SceneLog::from_ego_states(sim_dataset.scene(SCENE_ID)?.simulated());
    let visualisation = visualise_scene(&scene_log, SCENE_ID, &map, &configuration.visualiser)?;
    visualisation.save(&configuration.visualiser.output_path)?;

    Ok(())
}
