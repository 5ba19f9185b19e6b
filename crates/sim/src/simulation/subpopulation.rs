//! A subpopulation and its two generation buffers.
//!
//! Each subpopulation owns a parent buffer (the current generation, read during
//! reproduction) and a child buffer (the next generation, written during
//! reproduction). One generation proceeds as:
//!
//! 1. [`Subpopulation::evaluate_fitness`] scores every parent.
//! 2. Callers may adjust the values through [`Subpopulation::fitness_mut`].
//! 3. [`Subpopulation::rebuild_samplers`] replaces the parent samplers.
//! 4. Reproduction draws parents with [`Subpopulation::draw_parent`] and writes
//!    every child genome.
//! 5. [`Subpopulation::swap_generations`] promotes the children to parents.
//!
//! Size and sex-ratio changes only ever apply to the child generation; they
//! become parent values at the next swap.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use rayon::prelude::*;

use crate::base::FitnessValue;
use crate::errors::SubpopulationError;
use crate::evolution::{DiploidFitness, MultiplicativeFitness, ParentSamplers};
use crate::genome::{
    first_male_index, ChromosomeType, GenerationRole, Genome, GenomeBuffer, SexConfig, Sex,
};

/// A subpopulation of diploid individuals.
#[derive(Debug, Clone)]
pub struct Subpopulation {
    id: Arc<str>,
    /// Sex model; `None` for hermaphrodites
    sex: Option<SexConfig>,
    fitness_model: MultiplicativeFitness,

    parent: GenomeBuffer,
    child: GenomeBuffer,

    parent_size: usize,
    child_size: usize,
    parent_sex_ratio: f64,
    child_sex_ratio: f64,
    /// Always 0 when sex is not modeled
    parent_first_male: usize,
    child_first_male: usize,

    /// Per-parent fitness; empty between a swap and the next evaluation
    fitness: Vec<FitnessValue>,
    /// `None` between a swap and the next rebuild
    samplers: Option<ParentSamplers>,
}

impl Subpopulation {
    /// Create a hermaphroditic subpopulation of `size` individuals with empty
    /// genomes and equal-weight samplers.
    pub fn new(id: impl Into<Arc<str>>, size: usize) -> Self {
        Self {
            id: id.into(),
            sex: None,
            fitness_model: MultiplicativeFitness::default(),
            parent: GenomeBuffer::fit(size, None),
            child: GenomeBuffer::fit(size, None),
            parent_size: size,
            child_size: size,
            parent_sex_ratio: 0.0,
            child_sex_ratio: 0.0,
            parent_first_male: 0,
            child_first_male: 0,
            fitness: vec![FitnessValue::NEUTRAL_FITNESS; size],
            samplers: Some(ParentSamplers::uniform(size, None)),
        }
    }

    /// Create a subpopulation with separate sexes.
    ///
    /// # Errors
    /// Returns an error if the sex ratio leaves no females or no males.
    pub fn new_sexual(
        id: impl Into<Arc<str>>,
        size: usize,
        sex: SexConfig,
    ) -> Result<Self, SubpopulationError> {
        let first_male = first_male_index(size, sex.sex_ratio, GenerationRole::Parent)?;
        let layout = Some((sex.modeled_chromosome, first_male));

        Ok(Self {
            id: id.into(),
            sex: Some(sex),
            fitness_model: MultiplicativeFitness::new(sex.x_dominance_coeff),
            parent: GenomeBuffer::fit(size, layout),
            child: GenomeBuffer::fit(size, layout),
            parent_size: size,
            child_size: size,
            parent_sex_ratio: sex.sex_ratio,
            child_sex_ratio: sex.sex_ratio,
            parent_first_male: first_male,
            child_first_male: first_male,
            fitness: vec![FitnessValue::NEUTRAL_FITNESS; size],
            samplers: Some(ParentSamplers::uniform(size, Some(first_male))),
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether separate sexes are modeled.
    #[inline]
    pub fn is_sexual(&self) -> bool {
        self.sex.is_some()
    }

    #[inline]
    pub fn sex_config(&self) -> Option<&SexConfig> {
        self.sex.as_ref()
    }

    /// Chromosome type carried by modeled genomes.
    #[inline]
    pub fn modeled_chromosome(&self) -> ChromosomeType {
        self.sex
            .map_or(ChromosomeType::Autosome, |s| s.modeled_chromosome)
    }

    #[inline]
    pub fn parent_size(&self) -> usize {
        self.parent_size
    }

    #[inline]
    pub fn child_size(&self) -> usize {
        self.child_size
    }

    /// Proportion of males among parents.
    #[inline]
    pub fn parent_sex_ratio(&self) -> Option<f64> {
        self.sex.map(|_| self.parent_sex_ratio)
    }

    /// Proportion of males among children.
    #[inline]
    pub fn child_sex_ratio(&self) -> Option<f64> {
        self.sex.map(|_| self.child_sex_ratio)
    }

    #[inline]
    pub fn parent_first_male_index(&self) -> Option<usize> {
        self.sex.map(|_| self.parent_first_male)
    }

    #[inline]
    pub fn child_first_male_index(&self) -> Option<usize> {
        self.sex.map(|_| self.child_first_male)
    }

    /// The current generation's genomes.
    #[inline]
    pub fn parent_genomes(&self) -> &GenomeBuffer {
        &self.parent
    }

    /// The next generation's genomes.
    #[inline]
    pub fn child_genomes(&self) -> &GenomeBuffer {
        &self.child
    }

    /// Both genomes of parent `index`.
    pub fn parent_pair(&self, index: usize) -> Result<(&Genome, &Genome), SubpopulationError> {
        self.parent
            .pair(index)
            .ok_or(SubpopulationError::IndividualOutOfBounds {
                index,
                size: self.parent_size,
            })
    }

    /// Write target for genome `haplotype` of child `index`.
    pub fn child_genome_mut(
        &mut self,
        index: usize,
        haplotype: usize,
    ) -> Result<&mut Genome, SubpopulationError> {
        if haplotype > 1 {
            return Err(SubpopulationError::HaplotypeOutOfBounds(haplotype));
        }
        let size = self.child_size;
        self.child
            .genome_mut(index, haplotype)
            .ok_or(SubpopulationError::IndividualOutOfBounds { index, size })
    }

    /// Sex of parent `index`.
    #[inline]
    pub fn sex_of_parent(&self, index: usize) -> Sex {
        sex_at(self.sex.is_some(), self.parent_first_male, index)
    }

    /// Sex of child `index`.
    #[inline]
    pub fn sex_of_child(&self, index: usize) -> Sex {
        sex_at(self.sex.is_some(), self.child_first_male, index)
    }

    /// Score every parent.
    ///
    /// Runs in parallel over individuals; each value depends only on that
    /// individual's genomes, so the result does not depend on thread count.
    pub fn evaluate_fitness(&mut self) {
        let model = self.fitness_model;
        self.parent
            .genomes()
            .par_chunks_exact(2)
            .map(|pair| model.diploid_fitness(&pair[0], &pair[1]))
            .collect_into_vec(&mut self.fitness);
    }

    /// Per-parent fitness from the last evaluation.
    #[inline]
    pub fn fitness(&self) -> &[FitnessValue] {
        &self.fitness
    }

    /// Mutable per-parent fitness, for adjustment before samplers are rebuilt.
    #[inline]
    pub fn fitness_mut(&mut self) -> &mut [FitnessValue] {
        &mut self.fitness
    }

    /// Replace the parent samplers with ones built from the current fitness.
    ///
    /// # Errors
    /// Returns an error if fitness has not been evaluated since the last swap,
    /// or if a value is NaN.
    pub fn rebuild_samplers(&mut self) -> Result<(), SubpopulationError> {
        if self.fitness.len() != self.parent_size {
            return Err(SubpopulationError::StaleSamplers {
                id: self.id.to_string(),
            });
        }

        let samplers = ParentSamplers::build(&self.fitness, self.parent_first_male_index())?;
        for (sex, sampler) in samplers.iter() {
            if !sampler.is_viable() {
                tracing::warn!(
                    subpopulation = %self.id,
                    %sex,
                    candidates = sampler.len(),
                    "no parent with positive fitness"
                );
            }
        }
        tracing::trace!(subpopulation = %self.id, size = self.parent_size, "rebuilt parent samplers");

        self.samplers = Some(samplers);
        Ok(())
    }

    /// Evaluate fitness and rebuild samplers in one go.
    pub fn update_fitness(&mut self) -> Result<(), SubpopulationError> {
        self.evaluate_fitness();
        self.rebuild_samplers()
    }

    /// Draw one parent of the given sex, proportional to fitness.
    ///
    /// Hermaphroditic subpopulations only serve [`Sex::Hermaphrodite`];
    /// sexual ones only serve [`Sex::Female`] and [`Sex::Male`]. The returned
    /// index is into the parent buffer.
    pub fn draw_parent<R: Rng + ?Sized>(
        &self,
        sex: Sex,
        rng: &mut R,
    ) -> Result<usize, SubpopulationError> {
        let samplers = self
            .samplers
            .as_ref()
            .ok_or_else(|| SubpopulationError::StaleSamplers {
                id: self.id.to_string(),
            })?;
        let sampler = samplers
            .get(sex)
            .ok_or_else(|| SubpopulationError::SexMismatch {
                id: self.id.to_string(),
                requested: sex,
            })?;
        sampler
            .sample(rng)
            .ok_or_else(|| SubpopulationError::NoViableParent {
                id: self.id.to_string(),
                sex,
            })
    }

    /// Whether samplers reflect the current parents.
    #[inline]
    pub fn has_samplers(&self) -> bool {
        self.samplers.is_some()
    }

    /// Change the size of the next generation.
    ///
    /// The child buffer is refitted right away so reproduction writes into a
    /// buffer of the new shape. On error nothing changes.
    pub fn set_size(&mut self, size: usize) -> Result<(), SubpopulationError> {
        let first_male = match self.sex {
            Some(_) => first_male_index(size, self.child_sex_ratio, GenerationRole::Child)?,
            None => 0,
        };
        self.child_size = size;
        self.child_first_male = first_male;
        self.refit_child();
        Ok(())
    }

    /// Change the proportion of males in the next generation.
    ///
    /// # Errors
    /// Returns an error for hermaphroditic subpopulations, or if the ratio
    /// leaves no females or no males. On error nothing changes.
    pub fn set_sex_ratio(&mut self, sex_ratio: f64) -> Result<(), SubpopulationError> {
        if self.sex.is_none() {
            return Err(SubpopulationError::SexNotEnabled {
                id: self.id.to_string(),
            });
        }
        let first_male = first_male_index(self.child_size, sex_ratio, GenerationRole::Child)?;
        self.child_sex_ratio = sex_ratio;
        self.child_first_male = first_male;
        self.refit_child();
        Ok(())
    }

    /// Promote the child generation to parents.
    ///
    /// The buffers trade places without copying. The old parent buffer becomes
    /// the next child buffer; it is reused as-is when the generation shape is
    /// unchanged and refitted otherwise. Fitness and samplers are invalidated.
    ///
    /// Returns whether the child buffer was refitted.
    pub fn swap_generations(&mut self) -> Result<bool, SubpopulationError> {
        std::mem::swap(&mut self.parent, &mut self.child);

        let reshaped = self.parent_size != self.child_size
            || self.parent_sex_ratio != self.child_sex_ratio
            || self.parent_first_male != self.child_first_male;

        self.parent_size = self.child_size;
        self.parent_sex_ratio = self.child_sex_ratio;
        self.parent_first_male = self.child_first_male;

        if reshaped {
            if self.sex.is_some() {
                // Revalidate in the child role before refitting
                self.child_first_male =
                    first_male_index(self.child_size, self.child_sex_ratio, GenerationRole::Child)?;
            }
            self.refit_child();
        } else {
            self.child.clear_mutations();
        }

        self.fitness.clear();
        self.samplers = None;

        Ok(reshaped)
    }

    /// Mean parent fitness, if fitness is current.
    pub fn mean_fitness(&self) -> Option<f64> {
        if self.fitness.is_empty() || self.fitness.len() != self.parent_size {
            return None;
        }
        let total: f64 = self.fitness.iter().map(|w| w.get()).sum();
        Some(total / self.fitness.len() as f64)
    }

    /// Number of distinct mutations carried by at least one parent genome.
    pub fn segregating_mutation_count(&self) -> usize {
        self.parent
            .genomes()
            .iter()
            .flat_map(|g| g.mutations())
            .map(|m| m.id())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Mean number of mutations per parent genome, counting modeled genomes only.
    pub fn mean_mutations_per_genome(&self) -> f64 {
        let (genomes, mutations) = self
            .parent
            .genomes()
            .iter()
            .filter(|g| !g.is_null())
            .fold((0usize, 0usize), |(n, m), g| (n + 1, m + g.len()));
        if genomes == 0 {
            0.0
        } else {
            mutations as f64 / genomes as f64
        }
    }

    fn refit_child(&mut self) {
        let layout = self
            .sex
            .map(|s| (s.modeled_chromosome, self.child_first_male));
        self.child = GenomeBuffer::fit(self.child_size, layout);
        tracing::debug!(
            subpopulation = %self.id,
            size = self.child_size,
            first_male = ?self.child_first_male_index(),
            "refitted child genome buffer"
        );
    }
}

#[inline]
fn sex_at(sexual: bool, first_male: usize, index: usize) -> Sex {
    if !sexual {
        Sex::Hermaphrodite
    } else if index < first_male {
        Sex::Female
    } else {
        Sex::Male
    }
}
