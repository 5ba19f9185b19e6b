//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use fwdsel_sim::prelude::*;
//!
//! let mut subpop = Subpopulation::new("p1", 10);
//! subpop.update_fitness().unwrap();
//! assert_eq!(subpop.fitness()[0], FitnessValue::NEUTRAL_FITNESS);
//! ```

pub use crate::base::{FitnessEffects, FitnessValue, Mutation, MutationType};
pub use crate::errors::{self, SimulationError, SubpopulationError};
pub use crate::evolution::{
    DiploidFitness, MultiplicativeFitness, MutationModel, RecombinationModel, Reproduction,
    WrightFisher,
};
pub use crate::genome::{ChromosomeType, Genome, GenomeBuffer, Sex, SexConfig};
pub use crate::simulation::{
    Simulation, SimulationBuilder, SimulationConfig, Subpopulation, SubpopulationConfig,
};
