pub mod displacement_error;
pub mod distance_to_ref;
pub mod driven_miles;
pub mod simulation_metric;
pub mod yaw_error;

pub use displacement_error::DisplacementErrorL2Metric;
pub use distance_to_ref::DistanceToRefTrajectoryMetric;
pub use driven_miles::SimulatedDrivenMilesMetric;
pub use simulation_metric::SimulationMetric;
pub use yaw_error::YawErrorCAMetric;
