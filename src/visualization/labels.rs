use super::scene_log::AgentRecord;

pub const PERCEPTION_LABELS: [&str; 17] = [
    "PERCEPTION_LABEL_NOT_SET",
    "PERCEPTION_LABEL_UNKNOWN",
    "PERCEPTION_LABEL_DONTCARE",
    "PERCEPTION_LABEL_CAR",
    "PERCEPTION_LABEL_VAN",
    "PERCEPTION_LABEL_TRAM",
    "PERCEPTION_LABEL_BUS",
    "PERCEPTION_LABEL_TRUCK",
    "PERCEPTION_LABEL_EMERGENCY_VEHICLE",
    "PERCEPTION_LABEL_OTHER_VEHICLE",
    "PERCEPTION_LABEL_BICYCLE",
    "PERCEPTION_LABEL_MOTORCYCLE",
    "PERCEPTION_LABEL_CYCLIST",
    "PERCEPTION_LABEL_MOTORCYCLIST",
    "PERCEPTION_LABEL_PEDESTRIAN",
    "PERCEPTION_LABEL_ANIMAL",
    "AVRESEARCH_LABEL_DONTCARE",
];

// NOT_SET, UNKNOWN and DONTCARE are not real classes.
const FIRST_REAL_LABEL: usize = 3;

pub const DEFAULT_AGENT_COLOR: &str = "#1F77B4";

pub fn label_color(label: &str) -> &'static str {
    match label {
        "PERCEPTION_LABEL_CAR" => "#1F77B4",
        "PERCEPTION_LABEL_CYCLIST" => "#CC33FF",
        "PERCEPTION_LABEL_PEDESTRIAN" => "#66CCFF",
        _ => DEFAULT_AGENT_COLOR,
    }
}

/// Most likely label of an agent and its probability.
pub fn best_label(probabilities: &[f32]) -> (&'static str, f32) {
    probabilities
        .iter()
        .take(PERCEPTION_LABELS.len())
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((i, p)),
        })
        .map(|(i, p)| (PERCEPTION_LABELS[i], p))
        .unwrap_or((PERCEPTION_LABELS[0], 0.0))
}

/// Keeps the agents whose best real label is more likely than `threshold`.
pub fn filter_agents_by_labels(agents: &[AgentRecord], threshold: f32) -> Vec<AgentRecord> {
    agents
        .iter()
        .filter(|agent| {
            agent
                .label_probabilities
                .iter()
                .skip(FIRST_REAL_LABEL)
                .any(|&p| p > threshold)
        })
        .cloned()
        .collect()
}
