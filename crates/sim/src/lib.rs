//! # Simulation Crate
//!
//! The `fwdsel-sim` crate is a forward-time, individual-based simulation
//! kernel for diploid populations under selection. Each individual carries two
//! genomes, each a position-sorted list of shared mutation records. Every
//! generation, fitness is computed multiplicatively from those mutations,
//! parents are sampled in proportion to fitness, children are produced into a
//! second genome buffer, and the two buffers swap roles.
//!
//! Separate sexes and X or Y chromosome models are supported; chromosome
//! copies that are not modeled are represented by placeholder genomes so that
//! every individual keeps exactly two genome slots.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod prelude;
pub mod simulation;

pub use base::{FitnessValue, Mutation, MutationType};
pub use simulation::{Simulation, SimulationBuilder, SimulationConfig, Subpopulation};
