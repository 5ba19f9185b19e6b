//! Base value types: fitness values, mutation records and mutation types.

pub mod fitness;
mod mutation;

pub use fitness::FitnessValue;
pub use mutation::{FitnessEffects, Mutation, MutationType};
