use rand::Rng;

use crate::error::PolicyError;
use crate::simulation::EgoState;

/// Proposes the next ego state given the current simulated state and the
/// logged next state.
pub trait TrackingPolicy {
    fn predict(&mut self, current: &EgoState, target: &EgoState) -> EgoState;
}

/// Reproduces the log exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerfectTrackingPolicy;

impl TrackingPolicy for PerfectTrackingPolicy {
    fn predict(&mut self, _current: &EgoState, target: &EgoState) -> EgoState {
        *target
    }
}

/// Follows the log with uniform positional noise of up to `noise_m` metres
/// on each axis.
pub struct NoisyTrackingPolicy<R: Rng> {
    rng: R,
    noise_m: f64,
}

impl<R: Rng> NoisyTrackingPolicy<R> {
    pub fn new(rng: R, noise_m: f64) -> Result<Self, PolicyError> {
        if !noise_m.is_finite() {
            return Err(PolicyError::InvalidNoise(noise_m));
        }
        Ok(Self {
            rng,
            noise_m: noise_m.abs(),
        })
    }
}

impl<R: Rng> TrackingPolicy for NoisyTrackingPolicy<R> {
    fn predict(&mut self, _current: &EgoState, target: &EgoState) -> EgoState {
        let dx = self.rng.random_range(-self.noise_m..=self.noise_m);
        let dy = self.rng.random_range(-self.noise_m..=self.noise_m);
        EgoState::new(target.centroid[0] + dx, target.centroid[1] + dy, target.yaw)
    }
}
