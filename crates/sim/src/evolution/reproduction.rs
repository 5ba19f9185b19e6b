//! Reproduction: filling a subpopulation's child buffer from its parents.
//!
//! The kernel only owns the buffers and samplers; how parents are chosen and
//! how gametes are formed is left to an implementation of [`Reproduction`].
//! [`WrightFisher`] is the standard non-overlapping-generations model with
//! recombination and new mutations.

use std::fmt::Debug;
use std::sync::Arc;

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::base::Mutation;
use crate::errors::SimulationError;
use crate::evolution::{MutationModel, RecombinationModel};
use crate::genome::{ChromosomeType, Sex};
use crate::simulation::Subpopulation;

/// Produces every child genome of a subpopulation for one generation.
///
/// Implementations must write every modeled child genome, and must only draw
/// parents through [`Subpopulation::draw_parent`] so runs stay reproducible for
/// a given seed.
pub trait Reproduction: Debug + Send {
    fn reproduce(
        &mut self,
        subpopulation: &mut Subpopulation,
        generation: usize,
        rng: &mut Xoshiro256PlusPlus,
    ) -> Result<(), SimulationError>;
}

/// Wright-Fisher reproduction with crossing over and new mutations.
///
/// Each child draws a mother and a father independently (two hermaphrodite
/// draws when sex is not modeled, so selfing is possible). When X or Y is
/// modeled, a father passes his X to daughters and his Y to sons without
/// recombination; everything else recombines.
#[derive(Debug, Clone)]
pub struct WrightFisher {
    mutation: MutationModel,
    recombination: RecombinationModel,
}

impl WrightFisher {
    pub fn new(mutation: MutationModel, recombination: RecombinationModel) -> Self {
        Self {
            mutation,
            recombination,
        }
    }

    #[inline]
    pub fn mutation_model(&self) -> &MutationModel {
        &self.mutation
    }

    #[inline]
    pub fn recombination_model(&self) -> &RecombinationModel {
        &self.recombination
    }

    /// Gamete from parent `index`, recombined across both genomes.
    fn recombinant_gamete<R: Rng + ?Sized>(
        &self,
        subpopulation: &Subpopulation,
        index: usize,
        rng: &mut R,
    ) -> Result<Vec<Arc<Mutation>>, SimulationError> {
        let (first, second) = subpopulation.parent_pair(index)?;
        Ok(self.recombination.gamete(first, second, rng))
    }

    /// Gamete from a father: sex chromosomes are inherited whole.
    fn paternal_gamete<R: Rng + ?Sized>(
        &self,
        subpopulation: &Subpopulation,
        father: usize,
        child_sex: Sex,
        rng: &mut R,
    ) -> Result<Vec<Arc<Mutation>>, SimulationError> {
        match subpopulation.modeled_chromosome() {
            ChromosomeType::Autosome => self.recombinant_gamete(subpopulation, father, rng),
            ChromosomeType::X | ChromosomeType::Y => {
                let (x, y) = subpopulation.parent_pair(father)?;
                let inherited = if child_sex == Sex::Male { y } else { x };
                Ok(inherited.mutations().to_vec())
            }
        }
    }

    /// Add new mutations and write a gamete into a child slot.
    ///
    /// Slots for chromosomes that are not modeled are left untouched.
    fn write_gamete<R: Rng + ?Sized>(
        &mut self,
        subpopulation: &mut Subpopulation,
        child: usize,
        haplotype: usize,
        mut gamete: Vec<Arc<Mutation>>,
        generation: usize,
        rng: &mut R,
    ) -> Result<(), SimulationError> {
        let target = subpopulation.child_genome_mut(child, haplotype)?;
        if target.is_null() {
            return Ok(());
        }
        self.mutation.mutate(&mut gamete, generation, rng);
        target.set_mutations(gamete)?;
        Ok(())
    }
}

impl Reproduction for WrightFisher {
    fn reproduce(
        &mut self,
        subpopulation: &mut Subpopulation,
        generation: usize,
        rng: &mut Xoshiro256PlusPlus,
    ) -> Result<(), SimulationError> {
        for child in 0..subpopulation.child_size() {
            let child_sex = subpopulation.sex_of_child(child);
            let (mother, father) = match child_sex {
                Sex::Hermaphrodite => (
                    subpopulation.draw_parent(Sex::Hermaphrodite, rng)?,
                    subpopulation.draw_parent(Sex::Hermaphrodite, rng)?,
                ),
                Sex::Female | Sex::Male => (
                    subpopulation.draw_parent(Sex::Female, rng)?,
                    subpopulation.draw_parent(Sex::Male, rng)?,
                ),
            };

            let maternal = self.recombinant_gamete(subpopulation, mother, rng)?;
            let paternal = self.paternal_gamete(subpopulation, father, child_sex, rng)?;

            self.write_gamete(subpopulation, child, 0, maternal, generation, rng)?;
            self.write_gamete(subpopulation, child, 1, paternal, generation, rng)?;
        }

        tracing::trace!(
            subpopulation = subpopulation.id(),
            generation,
            children = subpopulation.child_size(),
            next_mutation_id = self.mutation.next_id(),
            "reproduced"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{FitnessEffects, MutationType};
    use crate::genome::{is_sorted_by_position, SexConfig};
    use rand::SeedableRng;

    fn neutral_model(rate: f64) -> WrightFisher {
        let t = MutationType::new(1, 0.5, FitnessEffects::Fixed { s: 0.0 }).unwrap();
        WrightFisher::new(
            MutationModel::new(rate, 1_000, vec![(t, 1.0)]).unwrap(),
            RecombinationModel::new(1e-3, 1_000).unwrap(),
        )
    }

    #[test]
    fn test_children_receive_mutations() {
        let mut model = neutral_model(1e-3);
        let mut subpop = Subpopulation::new("p1", 20);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);

        for generation in 0..5 {
            subpop.update_fitness().unwrap();
            model.reproduce(&mut subpop, generation, &mut rng).unwrap();
            subpop.swap_generations().unwrap();
        }

        assert!(subpop.segregating_mutation_count() > 0);
        for genome in subpop.parent_genomes().genomes() {
            assert!(is_sorted_by_position(genome.mutations()));
        }
    }

    #[test]
    fn test_reproduce_requires_fresh_samplers() {
        let mut model = neutral_model(0.0);
        let mut subpop = Subpopulation::new("p1", 4);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);

        subpop.swap_generations().unwrap();
        let err = model.reproduce(&mut subpop, 1, &mut rng).unwrap_err();
        assert!(matches!(err, SimulationError::Subpopulation(_)));
    }

    #[test]
    fn test_x_model_fills_only_modeled_slots() {
        let mut model = neutral_model(5e-3);
        let sex = SexConfig::new(0.5, ChromosomeType::X, 1.0);
        let mut subpop = Subpopulation::new_sexual("p1", 10, sex).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        for generation in 0..3 {
            subpop.update_fitness().unwrap();
            model.reproduce(&mut subpop, generation, &mut rng).unwrap();
            subpop.swap_generations().unwrap();
        }

        let first_male = subpop.parent_first_male_index().unwrap();
        for male in first_male..subpop.parent_size() {
            let (_, y) = subpop.parent_pair(male).unwrap();
            assert!(y.is_null());
            assert!(y.is_empty());
        }
        assert!(subpop.segregating_mutation_count() > 0);
    }

    #[test]
    fn test_y_passes_father_to_son() {
        let mut model = neutral_model(0.0);
        let sex = SexConfig::new(0.5, ChromosomeType::Y, 1.0);
        let mut subpop = Subpopulation::new_sexual("p1", 4, sex).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);

        let t = Arc::new(MutationType::neutral(2));
        let marker = Arc::new(Mutation::new(77, 5, 0.0, t, 0));
        for father in 2..4 {
            subpop.child_genome_mut(father, 1).unwrap().set_mutations(vec![Arc::clone(&marker)]).unwrap();
        }
        subpop.swap_generations().unwrap();
        subpop.update_fitness().unwrap();

        model.reproduce(&mut subpop, 1, &mut rng).unwrap();
        subpop.swap_generations().unwrap();

        for son in 2..4 {
            let (_, y) = subpop.parent_pair(son).unwrap();
            assert_eq!(y.mutations().len(), 1);
            assert_eq!(y.mutations()[0].id(), 77);
        }
        for daughter in 0..2 {
            let (a, b) = subpop.parent_pair(daughter).unwrap();
            assert!(a.is_null() && b.is_null());
        }
    }
}
