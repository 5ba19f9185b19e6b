//! Simulation engine.
//!
//! This module provides the main simulation loop that advances every
//! subpopulation through fitness evaluation, parent sampling, reproduction and
//! the generation swap.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::base::FitnessValue;
use crate::errors::SimulationError;
use crate::evolution::{Reproduction, WrightFisher};
use crate::simulation::{SimulationConfig, Subpopulation};

/// Summary of one subpopulation at the current generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SubpopulationStats {
    pub id: String,
    pub size: usize,
    pub first_male_index: Option<usize>,
    /// `None` until fitness has been evaluated for the current parents
    pub mean_fitness: Option<f64>,
    pub segregating_mutations: usize,
    pub mean_mutations_per_genome: f64,
}

/// Main simulation engine.
#[derive(Debug)]
pub struct Simulation {
    /// Subpopulations, advanced in this order every generation
    subpopulations: Vec<Subpopulation>,
    reproduction: Box<dyn Reproduction>,
    config: SimulationConfig,
    /// Number of completed generations
    generation: usize,
    /// Random number generator (using Xoshiro256++ for better performance)
    rng: Xoshiro256PlusPlus,
}

impl Simulation {
    /// Create a simulation with Wright-Fisher reproduction.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let reproduction =
            WrightFisher::new(config.mutation_model()?, config.recombination_model()?);
        Self::with_reproduction(config, Box::new(reproduction))
    }

    /// Create a simulation with a custom reproduction collaborator.
    pub fn with_reproduction(
        config: SimulationConfig,
        reproduction: Box<dyn Reproduction>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let subpopulations = config
            .subpopulations
            .iter()
            .map(|s| s.build())
            .collect::<Result<Vec<_>, _>>()?;

        // Create RNG from seed or thread_rng
        let rng = match config.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
        };

        tracing::info!(
            subpopulations = subpopulations.len(),
            generations = config.generations,
            seed = ?config.seed,
            "simulation initialized"
        );

        Ok(Self {
            subpopulations,
            reproduction,
            config,
            generation: 0,
            rng,
        })
    }

    /// Number of completed generations.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn subpopulations(&self) -> &[Subpopulation] {
        &self.subpopulations
    }

    /// Look up a subpopulation by id.
    pub fn subpopulation(&self, id: &str) -> Result<&Subpopulation, SimulationError> {
        self.subpopulations
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| SimulationError::UnknownSubpopulation(id.to_string()))
    }

    /// Mutable access, for size or sex-ratio changes between generations.
    pub fn subpopulation_mut(&mut self, id: &str) -> Result<&mut Subpopulation, SimulationError> {
        self.subpopulations
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| SimulationError::UnknownSubpopulation(id.to_string()))
    }

    /// Advance one generation.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        self.step_with(|_, _| {})
    }

    /// Advance one generation, letting `adjust_fitness` modify each
    /// subpopulation's fitness values before parents are sampled.
    ///
    /// Every subpopulation is scored and resampled before any of them
    /// reproduces, so the callback sees the whole parent generation.
    pub fn step_with<F>(&mut self, mut adjust_fitness: F) -> Result<(), SimulationError>
    where
        F: FnMut(&str, &mut [FitnessValue]),
    {
        // 1. Score parents and rebuild samplers
        for subpop in &mut self.subpopulations {
            subpop.evaluate_fitness();
            let id = subpop.id().to_owned();
            adjust_fitness(&id, subpop.fitness_mut());
            subpop.rebuild_samplers()?;
        }

        // 2. Fill child buffers
        for subpop in &mut self.subpopulations {
            self.reproduction
                .reproduce(subpop, self.generation, &mut self.rng)?;
        }

        // 3. Promote children
        for subpop in &mut self.subpopulations {
            subpop.swap_generations()?;
        }

        self.generation += 1;
        tracing::debug!(generation = self.generation, "generation complete");
        Ok(())
    }

    /// Run until the configured number of generations has completed.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        let remaining = self.config.generations.saturating_sub(self.generation);
        self.run_for(remaining)
    }

    /// Run for a specific number of generations.
    pub fn run_for(&mut self, generations: usize) -> Result<(), SimulationError> {
        for _ in 0..generations {
            self.step()?;
        }
        Ok(())
    }

    /// Per-subpopulation summary of the current parents.
    pub fn stats(&self) -> Vec<SubpopulationStats> {
        self.subpopulations
            .iter()
            .map(|s| SubpopulationStats {
                id: s.id().to_string(),
                size: s.parent_size(),
                first_male_index: s.parent_first_male_index(),
                mean_fitness: s.mean_fitness(),
                segregating_mutations: s.segregating_mutation_count(),
                mean_mutations_per_genome: s.mean_mutations_per_genome(),
            })
            .collect()
    }

    /// Score the current parents without advancing, so [`Self::stats`]
    /// reports their mean fitness.
    pub fn evaluate_fitness(&mut self) {
        for subpop in &mut self.subpopulations {
            subpop.evaluate_fitness();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FitnessEffects;
    use crate::genome::{ChromosomeType, SexConfig};
    use crate::simulation::{MutationTypeConfig, SubpopulationConfig};

    fn config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            generations: 20,
            seed: Some(seed),
            chromosome_length: 10_000,
            mutation_rate: 1e-5,
            recombination_rate: 1e-5,
            mutation_types: vec![
                MutationTypeConfig::new(1, 0.5, FitnessEffects::Fixed { s: 0.0 }),
                MutationTypeConfig::new(2, 0.3, FitnessEffects::Fixed { s: -0.02 }),
            ],
            subpopulations: vec![
                SubpopulationConfig::new("p1", 30),
                SubpopulationConfig::new("p2", 20)
                    .with_sex(SexConfig::new(0.5, ChromosomeType::X, 0.5)),
            ],
        }
    }

    #[test]
    fn test_run_advances_generations() {
        let mut sim = Simulation::new(config(1)).unwrap();
        sim.run().unwrap();
        assert_eq!(sim.generation(), 20);

        // Already complete
        sim.run().unwrap();
        assert_eq!(sim.generation(), 20);

        sim.run_for(3).unwrap();
        assert_eq!(sim.generation(), 23);
    }

    #[test]
    fn test_same_seed_same_result() {
        let mut a = Simulation::new(config(42)).unwrap();
        let mut b = Simulation::new(config(42)).unwrap();
        a.run().unwrap();
        b.run().unwrap();
        a.evaluate_fitness();
        b.evaluate_fitness();

        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_unknown_subpopulation() {
        let mut sim = Simulation::new(config(1)).unwrap();
        assert!(sim.subpopulation("p1").is_ok());
        assert!(matches!(
            sim.subpopulation_mut("nope"),
            Err(SimulationError::UnknownSubpopulation(_))
        ));
    }

    #[test]
    fn test_callback_sees_each_subpopulation() {
        let mut sim = Simulation::new(config(3)).unwrap();
        let mut seen = Vec::new();
        sim.step_with(|id, fitness| seen.push((id.to_string(), fitness.len())))
            .unwrap();
        assert_eq!(seen, vec![("p1".to_string(), 30), ("p2".to_string(), 20)]);
    }

    #[test]
    fn test_callback_can_exclude_parents() {
        let mut cfg = config(5);
        cfg.mutation_rate = 0.0;
        cfg.subpopulations.truncate(1);
        let mut sim = Simulation::new(cfg).unwrap();

        // Only individual 0 may reproduce, so every child is a copy of it
        sim.step_with(|_, fitness| {
            for w in fitness.iter_mut().skip(1) {
                *w = FitnessValue::LETHAL_FITNESS;
            }
        })
        .unwrap();
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn test_all_lethal_fails() {
        let mut sim = Simulation::new(config(5)).unwrap();
        let err = sim
            .step_with(|_, fitness| fitness.fill(FitnessValue::LETHAL_FITNESS))
            .unwrap_err();
        assert!(matches!(err, SimulationError::Subpopulation(_)));
    }

    #[test]
    fn test_size_change_takes_effect_next_generation() {
        let mut sim = Simulation::new(config(9)).unwrap();
        sim.subpopulation_mut("p1").unwrap().set_size(45).unwrap();
        assert_eq!(sim.subpopulation("p1").unwrap().parent_size(), 30);

        sim.step().unwrap();
        let p1 = sim.subpopulation("p1").unwrap();
        assert_eq!(p1.parent_size(), 45);
        assert_eq!(p1.parent_genomes().len(), 90);
    }
}
