use ndarray::{Array1, ArrayView1, ArrayView2};

use super::SimulationMetric;
use crate::error::EvalError;
use crate::simulation::SimulationOutput;

/// Distance from each simulated centroid to the logged ego trajectory,
/// measured against the polyline through the logged centroids.
///
/// Only the first `scene_fraction` of the frames is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct DistanceToRefTrajectoryMetric {
    scene_fraction: f64,
}

impl DistanceToRefTrajectoryMetric {
    pub const NAME: &'static str = "distance_to_reference_trajectory";

    pub fn new(scene_fraction: f64) -> Result<Self, EvalError> {
        if !(scene_fraction > 0.0 && scene_fraction <= 1.0) {
            return Err(EvalError::InvalidSceneFraction(scene_fraction));
        }
        Ok(Self { scene_fraction })
    }

    /// Evaluates every frame of the scene.
    pub fn full_scene() -> Self {
        Self {
            scene_fraction: 1.0,
        }
    }

    pub fn scene_fraction(&self) -> f64 {
        self.scene_fraction
    }
}

impl Default for DistanceToRefTrajectoryMetric {
    fn default() -> Self {
        Self {
            scene_fraction: 0.8,
        }
    }
}

impl SimulationMetric for DistanceToRefTrajectoryMetric {
    fn metric_name(&self) -> &'static str {
        Self::NAME
    }

    fn compute(&self, simulation_output: &SimulationOutput) -> Result<Array1<f64>, EvalError> {
        let reference = simulation_output.recorded_centroids.view();
        if reference.nrows() == 0 {
            return Err(EvalError::EmptyInput);
        }
        let frames = simulation_output.simulated_centroids.nrows();
        let evaluated = ((frames as f64) * self.scene_fraction).ceil() as usize;

        Ok(simulation_output
            .simulated_centroids
            .rows()
            .into_iter()
            .take(evaluated.min(frames))
            .map(|point| distance_to_polyline(point, reference))
            .collect())
    }
}

fn distance_to_polyline(point: ArrayView1<f64>, polyline: ArrayView2<f64>) -> f64 {
    let p = [point[0], point[1]];
    if polyline.nrows() == 1 {
        let only = vertex(polyline, 0);
        return distance_to_segment(p, only, only);
    }
    (1..polyline.nrows())
        .map(|i| distance_to_segment(p, vertex(polyline, i - 1), vertex(polyline, i)))
        .fold(f64::INFINITY, f64::min)
}

fn vertex(polyline: ArrayView2<f64>, i: usize) -> [f64; 2] {
    [polyline[[i, 0]], polyline[[i, 1]]]
}

fn distance_to_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let length_sq = ab[0] * ab[0] + ab[1] * ab[1];
    let t = if length_sq > 0.0 {
        ((ap[0] * ab[0] + ap[1] * ab[1]) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = [a[0] + t * ab[0], a[1] + t * ab[1]];
    (p[0] - closest[0]).hypot(p[1] - closest[1])
}
