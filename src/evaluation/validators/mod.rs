pub mod counting_aggregator;
pub mod range_validator;
pub mod simulation_validator;

pub use counting_aggregator::ValidationCountingAggregator;
pub use range_validator::{DurationMode, RangeValidator};
pub use simulation_validator::{SimulationValidator, ValidatorOutput};
