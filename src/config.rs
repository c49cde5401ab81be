use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "DRIVE_GYM";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub log_level: String,
    pub reward: RewardConfig,
    pub episode: EpisodeConfig,
    pub visualiser: VisualiserConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            reward: RewardConfig::default(),
            episode: EpisodeConfig::default(),
            visualiser: VisualiserConfig::default(),
        }
    }
}

impl Configuration {
    /// Loads the configuration from an optional file, then lets environment
    /// variables override it. `__` separates the prefix and every nested key,
    /// e.g. `DRIVE_GYM__REWARD__YAW_WEIGHT=1.5`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    ClosedLoop,
    OpenLoop,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub kind: RewardKind,
    pub prefix: String,
    pub enable_clip: bool,
    pub rew_clip_thresh: f64,
    pub use_yaw: bool,
    pub yaw_weight: f64,
    pub stop_flag: bool,
    pub stop_thresh: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            kind: RewardKind::ClosedLoop,
            prefix: "CLE".to_string(),
            enable_clip: true,
            rew_clip_thresh: 15.0,
            use_yaw: true,
            yaw_weight: 3.0,
            stop_flag: false,
            stop_thresh: 20.0,
        }
    }
}

/// Parameters of the synthetic episode run by the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    pub num_frames: usize,
    pub speed_mps: f64,
    pub frame_dt_s: f64,
    pub noise_m: f64,
    pub seed: u64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            num_frames: 50,
            speed_mps: 10.0,
            frame_dt_s: 0.1,
            noise_m: 0.5,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualiserConfig {
    pub agent_traj_length: usize,
    pub ego_traj_length: usize,
    pub label_threshold: f32,
    pub map_radius_m: f64,
    pub output_path: String,
}

impl Default for VisualiserConfig {
    fn default() -> Self {
        Self {
            agent_traj_length: 20,
            ego_traj_length: 100,
            label_threshold: 0.1,
            map_radius_m: 50.0,
            output_path: "scene.json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Serialises tests that read the process environment through `load`.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn write_config(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("drive_gym_cfg_{}.json", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).expect("create config file");
        file.write_all(contents.as_bytes()).expect("write config file");
        path
    }

    #[test]
    fn test_defaults_match_reward_constructor_defaults() {
        let configuration = Configuration::default();
        assert_eq!(configuration.reward.kind, RewardKind::ClosedLoop);
        assert_eq!(configuration.reward.rew_clip_thresh, 15.0);
        assert_eq!(configuration.reward.yaw_weight, 3.0);
        assert!(!configuration.reward.stop_flag);
        assert_eq!(configuration.visualiser.agent_traj_length, 20);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_config(
            r#"{"reward": {"kind": "open_loop", "prefix": "OLE"}, "episode": {"num_frames": 12}}"#,
        );

        let configuration = Configuration::load(Some(&path)).expect("load config");
        assert_eq!(configuration.reward.kind, RewardKind::OpenLoop);
        assert_eq!(configuration.reward.prefix, "OLE");
        assert_eq!(configuration.reward.yaw_weight, 3.0);
        assert_eq!(configuration.episode.num_frames, 12);
        assert_eq!(configuration.log_level, "info");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_config(r#"{"reward": {"yaw_weight": 2.0}, "episode": {"seed": 7}}"#);

        std::env::set_var("DRIVE_GYM__REWARD__YAW_WEIGHT", "1.5");
        std::env::set_var("DRIVE_GYM_REWARD__USE_YAW", "false");
        let loaded = Configuration::load(Some(&path));
        std::env::remove_var("DRIVE_GYM__REWARD__YAW_WEIGHT");
        std::env::remove_var("DRIVE_GYM_REWARD__USE_YAW");
        std::fs::remove_file(path).ok();

        let configuration = loaded.expect("load config");
        assert_eq!(configuration.reward.yaw_weight, 1.5);
        // A single underscore after the prefix is not picked up.
        assert!(configuration.reward.use_yaw);
        assert_eq!(configuration.episode.seed, 7);
    }
}
