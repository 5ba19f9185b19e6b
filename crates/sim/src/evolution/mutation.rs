//! Generation of new mutations.
//!
//! New mutations arise at a per-base, per-generation rate. The number arising
//! on one gamete is Poisson distributed with mean `rate × length`; each lands
//! on a uniformly drawn position, takes a mutation type drawn by the configured
//! weights and draws its selection coefficient from that type's distribution
//! of fitness effects.

use std::sync::Arc;

use rand::distr::weighted::WeightedIndex;
use rand::Rng;
use rand_distr::{Distribution, Poisson};

use crate::base::{Mutation, MutationType};
use crate::errors::MutationError;

/// Mutation process for one chromosome.
#[derive(Debug, Clone)]
pub struct MutationModel {
    /// Per-base, per-generation mutation rate
    rate: f64,
    /// Number of positions, `[0, chromosome_length)`
    chromosome_length: u64,
    types: Vec<Arc<MutationType>>,
    type_index: Option<WeightedIndex<f64>>,
    next_id: u64,
}

impl MutationModel {
    /// Create a mutation model.
    ///
    /// `types` pairs each mutation type with its relative weight among new
    /// mutations.
    ///
    /// # Errors
    /// Returns an error if the rate is negative or not finite, the chromosome
    /// is empty, a weight is invalid, or the rate is positive while no type has
    /// positive weight.
    pub fn new(
        rate: f64,
        chromosome_length: u64,
        types: Vec<(MutationType, f64)>,
    ) -> Result<Self, MutationError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(MutationError::InvalidRate {
                name: "mutation",
                value: rate,
            });
        }
        if chromosome_length == 0 {
            return Err(MutationError::EmptyChromosome);
        }
        for (mutation_type, weight) in &types {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(MutationError::InvalidEffects {
                    id: mutation_type.id(),
                    reason: format!("weight {weight} must be finite and non-negative"),
                });
            }
        }

        let type_index = WeightedIndex::new(types.iter().map(|(_, w)| *w)).ok();
        if rate > 0.0 && type_index.is_none() {
            return Err(MutationError::NoMutationTypes);
        }

        Ok(Self {
            rate,
            chromosome_length,
            types: types.into_iter().map(|(t, _)| Arc::new(t)).collect(),
            type_index,
            next_id: 0,
        })
    }

    /// A model that never mutates.
    pub fn none(chromosome_length: u64) -> Result<Self, MutationError> {
        Self::new(0.0, chromosome_length, Vec::new())
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline]
    pub fn chromosome_length(&self) -> u64 {
        self.chromosome_length
    }

    /// Shared mutation-type descriptors, in configuration order.
    #[inline]
    pub fn types(&self) -> &[Arc<MutationType>] {
        &self.types
    }

    /// Look up a mutation type by id.
    pub fn mutation_type(&self, id: u32) -> Option<&Arc<MutationType>> {
        self.types.iter().find(|t| t.id() == id)
    }

    /// Id that the next new mutation will receive.
    #[inline]
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Sample how many new mutations arise on one gamete.
    pub fn sample_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let expected = self.rate * self.chromosome_length as f64;
        if expected <= 0.0 {
            return 0;
        }
        match Poisson::new(expected) {
            Ok(p) => p.sample(rng) as usize,
            Err(_) => 0,
        }
    }

    /// Create one new mutation, or `None` if no type can be drawn.
    pub fn new_mutation<R: Rng + ?Sized>(
        &mut self,
        generation: usize,
        rng: &mut R,
    ) -> Option<Arc<Mutation>> {
        let type_index = self.type_index.as_ref()?;
        let mutation_type = Arc::clone(&self.types[type_index.sample(rng)]);
        let position = rng.random_range(0..self.chromosome_length);
        let s = mutation_type.effects().sample(rng);

        let id = self.next_id;
        self.next_id += 1;

        Some(Arc::new(Mutation::new(id, position, s, mutation_type, generation)))
    }

    /// Add new mutations to a position-sorted mutation list.
    ///
    /// New mutations are placed after existing mutations at the same position,
    /// so the list stays sorted. Returns the number added.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        mutations: &mut Vec<Arc<Mutation>>,
        generation: usize,
        rng: &mut R,
    ) -> usize {
        let count = self.sample_count(rng);
        let mut added = 0;

        for _ in 0..count {
            let Some(mutation) = self.new_mutation(generation, rng) else {
                break;
            };
            let position = mutation.position();
            let at = mutations.partition_point(|m| m.position() <= position);
            mutations.insert(at, mutation);
            added += 1;
        }

        added
    }
}
