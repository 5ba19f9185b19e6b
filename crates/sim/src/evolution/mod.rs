//! Evolution module providing selection, parent sampling, mutation,
//! recombination and reproduction.
//!
//! - **Selection**: diploid multiplicative fitness from sorted mutation lists
//! - **Sampling**: fitness-weighted parent samplers, rebuilt every generation
//! - **Mutation**: Poisson-distributed new mutations with typed fitness effects
//! - **Recombination**: crossing over at Poisson-distributed breakpoints
//! - **Reproduction**: filling the child generation from drawn parents

pub mod mutation;
pub mod recombination;
pub mod reproduction;
pub mod sampler;
pub mod selection;

pub use mutation::MutationModel;
pub use recombination::RecombinationModel;
pub use reproduction::{Reproduction, WrightFisher};
pub use sampler::{ParentSampler, ParentSamplers};
pub use selection::{DiploidFitness, MultiplicativeFitness};
