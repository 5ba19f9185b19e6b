//! Subpopulations, configuration and the simulation engine.
//!
//! The most commonly used simulation types are re-exported here for
//! convenience so consumers can import them from `fwdsel_sim::simulation`.
//!
//! - `Subpopulation`: parent and child genome buffers, fitness and samplers.
//! - `Simulation`: the engine that advances every subpopulation one generation
//!   at a time.
//! - `SimulationConfig`: serde-backed description of a run.
//! - `SimulationBuilder`: fluent builder for constructing `Simulation` instances
//!   with sensible defaults and validation.

pub mod builder;
pub mod engine;
pub mod parameters;
pub mod subpopulation;

pub use builder::SimulationBuilder;
pub use engine::{Simulation, SubpopulationStats};
pub use parameters::{MutationTypeConfig, SimulationConfig, SubpopulationConfig};
pub use subpopulation::Subpopulation;
