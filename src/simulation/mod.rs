mod dataset;
mod output;
mod unroll;

pub use dataset::{EgoState, SceneDataset, SimulationDataset};
pub use output::SimulationOutput;
pub use unroll::{AgentsInsOuts, EgoInsOuts, UnrollInputOutput, UnrollInputs, UnrollOutputs};

/// Index of a scene inside the dataset.
pub type SceneId = usize;
