use std::sync::Arc;

use crate::base::Mutation;
use crate::errors::GenomeError;
use crate::genome::ChromosomeType;

/// One haplotype of an individual.
///
/// A modeled genome owns a list of shared mutation handles sorted ascending by
/// position. An unmodeled genome stands in for a chromosome copy that is not
/// simulated (the Y of a female when X is modeled, say) so that genome pairs
/// stay uniformly indexed; it never carries mutations.
#[derive(Debug, Clone)]
pub enum Genome {
    Modeled {
        chromosome: ChromosomeType,
        mutations: Vec<Arc<Mutation>>,
    },
    Unmodeled(ChromosomeType),
}

impl Genome {
    /// An empty modeled genome of the given type.
    pub fn modeled(chromosome: ChromosomeType) -> Self {
        Self::Modeled {
            chromosome,
            mutations: Vec::new(),
        }
    }

    /// A placeholder for a chromosome that is not modeled.
    pub fn unmodeled(chromosome: ChromosomeType) -> Self {
        Self::Unmodeled(chromosome)
    }

    /// Build a modeled genome from mutations already sorted by position.
    pub fn from_sorted(chromosome: ChromosomeType, mutations: Vec<Arc<Mutation>>) -> Self {
        debug_assert!(is_sorted_by_position(&mutations));
        Self::Modeled {
            chromosome,
            mutations,
        }
    }

    #[inline]
    pub fn chromosome_type(&self) -> ChromosomeType {
        match self {
            Self::Modeled { chromosome, .. } => *chromosome,
            Self::Unmodeled(chromosome) => *chromosome,
        }
    }

    /// Whether this is a placeholder for an unmodeled chromosome.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Unmodeled(_))
    }

    /// Mutations carried by this genome, sorted by position. Empty when unmodeled.
    #[inline]
    pub fn mutations(&self) -> &[Arc<Mutation>] {
        match self {
            Self::Modeled { mutations, .. } => mutations,
            Self::Unmodeled(_) => &[],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mutations().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mutations().is_empty()
    }

    /// Replace the mutation list. The list must already be sorted by position.
    ///
    /// # Errors
    /// Returns [`GenomeError::Unmodeled`] for a placeholder genome.
    pub fn set_mutations(&mut self, new_mutations: Vec<Arc<Mutation>>) -> Result<(), GenomeError> {
        debug_assert!(is_sorted_by_position(&new_mutations));
        match self {
            Self::Modeled { mutations, .. } => {
                *mutations = new_mutations;
                Ok(())
            }
            Self::Unmodeled(chromosome) => Err(GenomeError::Unmodeled(*chromosome)),
        }
    }

    /// Insert a mutation after any existing mutations at the same position.
    ///
    /// # Errors
    /// Returns [`GenomeError::Unmodeled`] for a placeholder genome.
    pub fn insert_mutation(&mut self, mutation: Arc<Mutation>) -> Result<(), GenomeError> {
        match self {
            Self::Modeled { mutations, .. } => {
                let position = mutation.position();
                let at = mutations.partition_point(|m| m.position() <= position);
                mutations.insert(at, mutation);
                Ok(())
            }
            Self::Unmodeled(chromosome) => Err(GenomeError::Unmodeled(*chromosome)),
        }
    }

    /// Drop all mutations, keeping the allocation. No-op for placeholders.
    pub fn clear(&mut self) {
        if let Self::Modeled { mutations, .. } = self {
            mutations.clear();
        }
    }
}

impl Default for Genome {
    fn default() -> Self {
        Self::modeled(ChromosomeType::Autosome)
    }
}

pub(crate) fn is_sorted_by_position(mutations: &[Arc<Mutation>]) -> bool {
    mutations
        .windows(2)
        .all(|pair| pair[0].position() <= pair[1].position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{FitnessEffects, MutationType};

    fn mutation(id: u64, position: u64) -> Arc<Mutation> {
        let mut_type = Arc::new(MutationType::new(1, 0.5, FitnessEffects::Fixed { s: 0.1 }).unwrap());
        Arc::new(Mutation::new(id, position, 0.1, mut_type, 0))
    }

    #[test]
    fn test_default_is_empty_autosome() {
        let genome = Genome::default();
        assert_eq!(genome.chromosome_type(), ChromosomeType::Autosome);
        assert!(!genome.is_null());
        assert!(genome.is_empty());
    }

    #[test]
    fn test_unmodeled_has_no_mutations() {
        let genome = Genome::unmodeled(ChromosomeType::Y);
        assert!(genome.is_null());
        assert_eq!(genome.chromosome_type(), ChromosomeType::Y);
        assert_eq!(genome.len(), 0);
    }

    #[test]
    fn test_write_into_unmodeled_fails() {
        let mut genome = Genome::unmodeled(ChromosomeType::X);
        assert_eq!(
            genome.set_mutations(vec![mutation(1, 5)]),
            Err(GenomeError::Unmodeled(ChromosomeType::X))
        );
        assert_eq!(
            genome.insert_mutation(mutation(1, 5)),
            Err(GenomeError::Unmodeled(ChromosomeType::X))
        );
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut genome = Genome::modeled(ChromosomeType::Autosome);
        for (id, pos) in [(1, 50), (2, 10), (3, 30), (4, 30), (5, 0)] {
            genome.insert_mutation(mutation(id, pos)).unwrap();
        }

        let positions: Vec<u64> = genome.mutations().iter().map(|m| m.position()).collect();
        assert_eq!(positions, vec![0, 10, 30, 30, 50]);

        // Stacked mutations keep insertion order
        let ids: Vec<u64> = genome.mutations().iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec![5, 2, 3, 4, 1]);
    }

    #[test]
    fn test_set_and_clear() {
        let mut genome = Genome::modeled(ChromosomeType::X);
        genome
            .set_mutations(vec![mutation(1, 1), mutation(2, 2)])
            .unwrap();
        assert_eq!(genome.len(), 2);
        genome.clear();
        assert!(genome.is_empty());
        assert_eq!(genome.chromosome_type(), ChromosomeType::X);
    }
}
