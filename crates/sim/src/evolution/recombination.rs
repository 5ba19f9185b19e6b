//! Crossing over between the two genomes of a parent.
//!
//! Breakpoints fall between positions: a breakpoint at `b` means positions
//! `< b` come from the current strand and positions `>= b` from the other one.
//! The count per meiosis is Poisson distributed with mean `rate × length`.

use std::sync::Arc;

use rand::Rng;
use rand_distr::{Distribution, Poisson};

use crate::base::Mutation;
use crate::errors::MutationError;
use crate::genome::Genome;

/// Recombination process for one chromosome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecombinationModel {
    /// Per-base, per-generation crossover rate
    rate: f64,
    chromosome_length: u64,
}

impl RecombinationModel {
    /// Create a recombination model.
    ///
    /// # Errors
    /// Returns an error if the rate is negative or not finite, or the
    /// chromosome is empty.
    pub fn new(rate: f64, chromosome_length: u64) -> Result<Self, MutationError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(MutationError::InvalidRate {
                name: "recombination",
                value: rate,
            });
        }
        if chromosome_length == 0 {
            return Err(MutationError::EmptyChromosome);
        }
        Ok(Self {
            rate,
            chromosome_length,
        })
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline]
    pub fn chromosome_length(&self) -> u64 {
        self.chromosome_length
    }

    /// Sample sorted breakpoints for one meiosis, each in `[1, length)`.
    pub fn sample_breakpoints<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u64> {
        let expected = self.rate * self.chromosome_length as f64;
        if expected <= 0.0 || self.chromosome_length < 2 {
            return Vec::new();
        }

        let count = match Poisson::new(expected) {
            Ok(p) => p.sample(rng) as usize,
            Err(_) => 0,
        };

        let mut breakpoints: Vec<u64> = (0..count)
            .map(|_| rng.random_range(1..self.chromosome_length))
            .collect();
        breakpoints.sort_unstable();
        breakpoints
    }

    /// Produce one recombinant gamete from a parent's two genomes.
    ///
    /// The starting strand is chosen uniformly. Unmodeled genomes contribute no
    /// mutations.
    pub fn gamete<R: Rng + ?Sized>(
        &self,
        first: &Genome,
        second: &Genome,
        rng: &mut R,
    ) -> Vec<Arc<Mutation>> {
        let breakpoints = self.sample_breakpoints(rng);
        let start_second = rng.random_bool(0.5);
        let (start, other) = if start_second {
            (second, first)
        } else {
            (first, second)
        };
        recombine(start.mutations(), other.mutations(), &breakpoints)
    }
}

/// Copy mutations segment by segment, switching strand at every breakpoint.
///
/// Both inputs and `breakpoints` must be sorted; the output is sorted.
pub fn recombine(
    start: &[Arc<Mutation>],
    other: &[Arc<Mutation>],
    breakpoints: &[u64],
) -> Vec<Arc<Mutation>> {
    if breakpoints.is_empty() {
        return start.to_vec();
    }

    let mut gamete = Vec::with_capacity(start.len().max(other.len()));
    let strands = [start, other];
    let mut lower = 0;

    for (segment, upper) in breakpoints
        .iter()
        .copied()
        .map(Some)
        .chain(std::iter::once(None))
        .enumerate()
    {
        let strand = strands[segment % 2];
        let from = strand.partition_point(|m| m.position() < lower);
        let to = match upper {
            Some(upper) => strand.partition_point(|m| m.position() < upper),
            None => strand.len(),
        };
        if from < to {
            gamete.extend_from_slice(&strand[from..to]);
        }
        if let Some(upper) = upper {
            lower = upper;
        }
    }

    gamete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{FitnessEffects, MutationType};
    use crate::genome::{is_sorted_by_position, ChromosomeType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn strand(id_base: u64, positions: &[u64]) -> Vec<Arc<Mutation>> {
        let t = Arc::new(MutationType::new(1, 0.5, FitnessEffects::Fixed { s: 0.0 }).unwrap());
        positions
            .iter()
            .enumerate()
            .map(|(k, &p)| Arc::new(Mutation::new(id_base + k as u64, p, 0.0, Arc::clone(&t), 0)))
            .collect()
    }

    fn ids(mutations: &[Arc<Mutation>]) -> Vec<u64> {
        mutations.iter().map(|m| m.id()).collect()
    }

    #[test]
    fn test_new_validates() {
        assert!(RecombinationModel::new(-0.1, 10).is_err());
        assert!(RecombinationModel::new(f64::INFINITY, 10).is_err());
        assert_eq!(
            RecombinationModel::new(1e-8, 0).unwrap_err(),
            MutationError::EmptyChromosome
        );
    }

    #[test]
    fn test_no_breakpoints_copies_start() {
        let a = strand(0, &[1, 5, 9]);
        let b = strand(100, &[2, 6]);
        assert_eq!(ids(&recombine(&a, &b, &[])), vec![0, 1, 2]);
        assert_eq!(ids(&recombine(&b, &a, &[])), vec![100, 101]);
    }

    #[test]
    fn test_single_crossover() {
        let a = strand(0, &[1, 5, 9]);
        let b = strand(100, &[2, 5, 6, 10]);
        // Positions < 5 from a, >= 5 from b
        assert_eq!(ids(&recombine(&a, &b, &[5])), vec![0, 101, 102, 103]);
    }

    #[test]
    fn test_double_crossover() {
        let a = strand(0, &[1, 4, 7, 9]);
        let b = strand(100, &[2, 5, 8]);
        let gamete = recombine(&a, &b, &[3, 8]);
        assert_eq!(ids(&gamete), vec![0, 101, 3]);
        assert!(is_sorted_by_position(&gamete));
    }

    #[test]
    fn test_repeated_breakpoint_cancels() {
        let a = strand(0, &[1, 4, 7]);
        let b = strand(100, &[2, 5, 8]);
        assert_eq!(ids(&recombine(&a, &b, &[4, 4])), vec![0, 1, 2]);
    }

    #[test]
    fn test_breakpoints_sorted_and_in_range() {
        let model = RecombinationModel::new(0.01, 1_000).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let breakpoints = model.sample_breakpoints(&mut rng);
            assert!(breakpoints.windows(2).all(|w| w[0] <= w[1]));
            assert!(breakpoints.iter().all(|&b| (1..1_000).contains(&b)));
        }
    }

    #[test]
    fn test_zero_rate_never_breaks() {
        let model = RecombinationModel::new(0.0, 1_000).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        assert!(model.sample_breakpoints(&mut rng).is_empty());
    }

    #[test]
    fn test_gamete_takes_whole_strand_without_crossover() {
        let model = RecombinationModel::new(0.0, 100).unwrap();
        let first = Genome::from_sorted(ChromosomeType::Autosome, strand(0, &[10, 20]));
        let second = Genome::from_sorted(ChromosomeType::Autosome, strand(100, &[15]));
        let mut rng = StdRng::seed_from_u64(2);

        let mut seen = [false; 2];
        for _ in 0..50 {
            match ids(&model.gamete(&first, &second, &mut rng)).as_slice() {
                [0, 1] => seen[0] = true,
                [100] => seen[1] = true,
                other => panic!("unexpected gamete {other:?}"),
            }
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn test_gamete_from_high_rate_stays_sorted() {
        let model = RecombinationModel::new(0.1, 100).unwrap();
        let first = Genome::from_sorted(ChromosomeType::X, strand(0, &[3, 17, 17, 40, 81, 99]));
        let second = Genome::from_sorted(ChromosomeType::X, strand(100, &[0, 17, 55, 60]));
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..200 {
            let gamete = model.gamete(&first, &second, &mut rng);
            assert!(is_sorted_by_position(&gamete));
        }
    }
}
