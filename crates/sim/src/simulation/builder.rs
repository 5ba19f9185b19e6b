//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for configuring and creating simulations with
//! sensible defaults and validation.

pub use crate::errors::BuilderError;
use crate::base::FitnessEffects;
use crate::evolution::Reproduction;
use crate::genome::SexConfig;
use crate::simulation::{MutationTypeConfig, Simulation, SimulationConfig, SubpopulationConfig};

/// Builder for constructing Simulation instances with a fluent API.
///
/// # Examples
///
/// ```
/// use fwdsel_sim::base::FitnessEffects;
/// use fwdsel_sim::simulation::SimulationBuilder;
///
/// let sim = SimulationBuilder::new()
///     .generations(100)
///     .chromosome_length(100_000)
///     .subpopulation("p1", 500)
///     .mutation_rate(1e-7)
///     .mutation_type(1, 0.5, FitnessEffects::Fixed { s: -0.01 })
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(sim.subpopulations().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SimulationBuilder {
    // Required parameters
    generations: Option<usize>,
    chromosome_length: Option<u64>,
    subpopulations: Vec<SubpopulationConfig>,

    // Evolutionary parameters (with defaults)
    mutation_rate: f64,                      // Default: 0.0 (no mutation)
    recombination_rate: f64,                 // Default: 0.0 (no recombination)
    mutation_types: Vec<MutationTypeConfig>, // Default: none
    seed: Option<u64>,                       // Default: None (random)

    reproduction: Option<Box<dyn Reproduction>>,
}

impl SimulationBuilder {
    /// Create a new simulation builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SimulationConfig) -> Self {
        Self {
            generations: Some(config.generations),
            chromosome_length: Some(config.chromosome_length),
            subpopulations: config.subpopulations,
            mutation_rate: config.mutation_rate,
            recombination_rate: config.recombination_rate,
            mutation_types: config.mutation_types,
            seed: config.seed,
            reproduction: None,
        }
    }

    /// Set the number of generations to run (required).
    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = Some(generations);
        self
    }

    /// Set the number of positions on the chromosome (required).
    pub fn chromosome_length(mut self, length: u64) -> Self {
        self.chromosome_length = Some(length);
        self
    }

    /// Add a hermaphroditic subpopulation (at least one is required).
    pub fn subpopulation(mut self, id: impl Into<String>, size: usize) -> Self {
        self.subpopulations.push(SubpopulationConfig::new(id, size));
        self
    }

    /// Add a subpopulation with separate sexes.
    pub fn sexual_subpopulation(mut self, id: impl Into<String>, size: usize, sex: SexConfig) -> Self {
        self.subpopulations
            .push(SubpopulationConfig::new(id, size).with_sex(sex));
        self
    }

    /// Set the per-base mutation rate (default: 0.0).
    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Set the per-base recombination rate (default: 0.0).
    pub fn recombination_rate(mut self, rate: f64) -> Self {
        self.recombination_rate = rate;
        self
    }

    /// Add a mutation type with weight 1.
    pub fn mutation_type(mut self, id: u32, dominance_coeff: f64, effects: FitnessEffects) -> Self {
        self.mutation_types
            .push(MutationTypeConfig::new(id, dominance_coeff, effects));
        self
    }

    /// Add a fully specified mutation type.
    pub fn mutation_type_config(mut self, mutation_type: MutationTypeConfig) -> Self {
        self.mutation_types.push(mutation_type);
        self
    }

    /// Set the random seed for reproducibility (default: None = random).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the default Wright-Fisher reproduction.
    pub fn reproduction(mut self, reproduction: Box<dyn Reproduction>) -> Self {
        self.reproduction = Some(reproduction);
        self
    }

    /// Assemble and validate the configuration without building a simulation.
    pub fn config(&self) -> Result<SimulationConfig, BuilderError> {
        let generations = self
            .generations
            .ok_or(BuilderError::MissingRequired("generations"))?;
        let chromosome_length = self
            .chromosome_length
            .ok_or(BuilderError::MissingRequired("chromosome_length"))?;
        if self.subpopulations.is_empty() {
            return Err(BuilderError::MissingRequired("subpopulation"));
        }

        let config = SimulationConfig {
            generations,
            seed: self.seed,
            chromosome_length,
            mutation_rate: self.mutation_rate,
            recombination_rate: self.recombination_rate,
            mutation_types: self.mutation_types.clone(),
            subpopulations: self.subpopulations.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build and validate the simulation.
    pub fn build(self) -> Result<Simulation, BuilderError> {
        let config = self.config()?;
        let simulation = match self.reproduction {
            Some(reproduction) => Simulation::with_reproduction(config, reproduction)?,
            None => Simulation::new(config)?,
        };
        Ok(simulation)
    }
}
