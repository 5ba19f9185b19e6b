//! Error types for the simulation kernel.
//!
//! Each concern gets its own enum; [`SimulationError`] aggregates them so the
//! engine and its callers can propagate with `?`.

use crate::genome::{ChromosomeType, GenerationRole, Sex};
use thiserror::Error;

/// Errors raised when writing into a genome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenomeError {
    /// Mutations were written into a placeholder for a chromosome that is not modeled.
    #[error("cannot write mutations into an unmodeled {0} genome")]
    Unmodeled(ChromosomeType),
}

/// Errors raised when building a parent sampler from fitness weights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    /// A weight was negative, NaN or the total overflowed.
    #[error("invalid fitness weights: {0}")]
    InvalidWeights(rand::distr::weighted::Error),
}

/// Errors raised by subpopulation bookkeeping and parent draws.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubpopulationError {
    /// The sex ratio rounds to a first-male index of zero.
    #[error("{role} sex ratio of {ratio} produced no females (size {size})")]
    NoFemales {
        role: GenerationRole,
        ratio: f64,
        size: usize,
    },

    /// The sex ratio rounds to a first-male index equal to the population size.
    #[error("{role} sex ratio of {ratio} produced no males (size {size})")]
    NoMales {
        role: GenerationRole,
        ratio: f64,
        size: usize,
    },

    /// The sex ratio is not a finite number.
    #[error("{role} sex ratio of {ratio} is not a finite proportion")]
    InvalidSexRatio { role: GenerationRole, ratio: f64 },

    /// A sex-specific operation was requested on a hermaphroditic subpopulation.
    #[error("subpopulation {id} does not model separate sexes")]
    SexNotEnabled { id: String },

    /// The requested parent sex does not exist under the subpopulation's configuration.
    #[error("cannot draw a {requested} parent from subpopulation {id}")]
    SexMismatch { id: String, requested: Sex },

    /// Samplers were not rebuilt since the last generation swap.
    #[error("parent samplers of subpopulation {id} are stale; update fitness before drawing")]
    StaleSamplers { id: String },

    /// Every candidate parent of the requested sex has zero fitness.
    #[error("subpopulation {id} has no {sex} parent with positive fitness")]
    NoViableParent { id: String, sex: Sex },

    /// An individual index was outside the buffer.
    #[error("individual {index} out of bounds (size = {size})")]
    IndividualOutOfBounds { index: usize, size: usize },

    /// A haplotype index other than 0 or 1.
    #[error("haplotype index {0} out of bounds (diploid individuals have haplotypes 0 and 1)")]
    HaplotypeOutOfBounds(usize),

    #[error(transparent)]
    Genome(#[from] GenomeError),

    #[error(transparent)]
    Sampler(#[from] SamplerError),
}

/// Errors raised when configuring or generating new mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    /// Mutation or recombination rate outside `[0, ∞)`.
    #[error("invalid {name} rate: {value} (must be finite and non-negative)")]
    InvalidRate { name: &'static str, value: f64 },

    /// A distribution of fitness effects could not be constructed.
    #[error("invalid fitness effect distribution for mutation type {id}: {reason}")]
    InvalidEffects { id: u32, reason: String },

    /// New mutations are requested but no mutation type has positive weight.
    #[error("mutation rate is positive but no mutation type has positive weight")]
    NoMutationTypes,

    /// The chromosome has no positions to place mutations or breakpoints on.
    #[error("chromosome length must be at least 1")]
    EmptyChromosome,
}

/// Errors raised when reading or validating a simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors that can occur during simulation building.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required parameter is missing
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Top-level error for constructing and stepping a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Subpopulation(#[from] SubpopulationError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Genome(#[from] GenomeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A subpopulation id was not found.
    #[error("unknown subpopulation: {0}")]
    UnknownSubpopulation(String),
}
