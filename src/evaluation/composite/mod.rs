pub mod composite_metric;
pub mod passed_driven_miles;

pub use composite_metric::CompositeMetric;
pub use passed_driven_miles::PassedDrivenMilesCompositeMetric;
