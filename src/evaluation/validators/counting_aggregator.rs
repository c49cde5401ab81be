use indexmap::IndexMap;

use super::ValidatorOutput;
use crate::simulation::SceneId;

/// Counts, per validator, how many scenes failed (or how many frames failed
/// when `failed_frames` is set).
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationCountingAggregator {
    failed_frames: bool,
}

impl ValidationCountingAggregator {
    pub fn new(failed_frames: bool) -> Self {
        Self { failed_frames }
    }

    pub fn aggregate(
        &self,
        scene_validation_results: &IndexMap<SceneId, IndexMap<String, ValidatorOutput>>,
    ) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for validators in scene_validation_results.values() {
            for (validator_name, output) in validators {
                let count = counts.entry(validator_name.clone()).or_insert(0);
                if self.failed_frames {
                    *count += output.failed_frames.len();
                } else if !output.is_valid_scene {
                    *count += 1;
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_log() -> IndexMap<SceneId, IndexMap<String, ValidatorOutput>> {
        let failed = ValidatorOutput {
            is_valid_scene: false,
            failed_frames: vec![3, 4],
        };
        let mut scene_0 = IndexMap::new();
        scene_0.insert("displacement".to_string(), failed.clone());
        scene_0.insert("yaw".to_string(), ValidatorOutput::valid());
        let mut scene_1 = IndexMap::new();
        scene_1.insert("displacement".to_string(), failed);
        scene_1.insert("yaw".to_string(), ValidatorOutput::valid());

        let mut log = IndexMap::new();
        log.insert(0, scene_0);
        log.insert(1, scene_1);
        log
    }

    #[test]
    fn test_counts_failed_scenes() {
        let counts = ValidationCountingAggregator::default().aggregate(&validation_log());
        assert_eq!(counts["displacement"], 2);
        assert_eq!(counts["yaw"], 0);
    }

    #[test]
    fn test_counts_failed_frames() {
        let counts = ValidationCountingAggregator::new(true).aggregate(&validation_log());
        assert_eq!(counts["displacement"], 4);
        assert_eq!(counts["yaw"], 0);
    }

    #[test]
    fn test_empty_log() {
        assert!(ValidationCountingAggregator::default()
            .aggregate(&IndexMap::new())
            .is_empty());
    }
}
