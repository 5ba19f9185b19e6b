use std::slice::ChunksExact;

use serde::{Deserialize, Serialize};

use crate::errors::SubpopulationError;
use crate::genome::{ChromosomeType, GenerationRole, Genome};

/// Sex-chromosome configuration of a sexual subpopulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SexConfig {
    /// Proportion of males.
    pub sex_ratio: f64,
    /// Chromosome type carried by the simulated genomes.
    #[serde(default)]
    pub modeled_chromosome: ChromosomeType,
    /// Dominance coefficient for mutations on an unpaired X chromosome.
    #[serde(default = "default_x_dominance")]
    pub x_dominance_coeff: f64,
}

fn default_x_dominance() -> f64 {
    1.0
}

impl SexConfig {
    pub fn new(sex_ratio: f64, modeled_chromosome: ChromosomeType, x_dominance_coeff: f64) -> Self {
        Self {
            sex_ratio,
            modeled_chromosome,
            x_dominance_coeff,
        }
    }

    /// Sexual autosomal model: separate sexes, no sex-chromosome special casing.
    pub fn autosomal(sex_ratio: f64) -> Self {
        Self::new(sex_ratio, ChromosomeType::Autosome, default_x_dominance())
    }
}

/// Compute the female/male boundary for `size` individuals with the given
/// proportion of males.
///
/// The boundary is `round((1 - sex_ratio) * size)`, rounding half away from
/// zero, and must leave at least one female and one male.
pub fn first_male_index(
    size: usize,
    sex_ratio: f64,
    role: GenerationRole,
) -> Result<usize, SubpopulationError> {
    if !sex_ratio.is_finite() {
        return Err(SubpopulationError::InvalidSexRatio {
            role,
            ratio: sex_ratio,
        });
    }

    let boundary = ((1.0 - sex_ratio) * size as f64).round();
    if boundary <= 0.0 {
        Err(SubpopulationError::NoFemales {
            role,
            ratio: sex_ratio,
            size,
        })
    } else if boundary >= size as f64 {
        Err(SubpopulationError::NoMales {
            role,
            ratio: sex_ratio,
            size,
        })
    } else {
        Ok(boundary as usize)
    }
}

/// Genomes of one generation, two per individual.
///
/// Individual `i` owns genomes `2i` and `2i + 1`. The buffer length is always
/// exactly twice the number of individuals it was fitted for.
#[derive(Debug, Clone, Default)]
pub struct GenomeBuffer {
    genomes: Vec<Genome>,
}

impl GenomeBuffer {
    /// Build a buffer of `2 * size` empty genomes laid out for the given sex model.
    ///
    /// Without sex, or when autosomes are modeled, every genome is an autosome.
    /// When X or Y is modeled, females `[0, first_male_index)` get `(X, X)` and
    /// males get `(X, Y)`; whichever of X/Y is not modeled becomes a placeholder.
    pub fn fit(size: usize, sex: Option<(ChromosomeType, usize)>) -> Self {
        let genomes = match sex {
            None | Some((ChromosomeType::Autosome, _)) => vec![Genome::default(); 2 * size],
            Some((modeled, first_male_index)) => {
                let x_model = if modeled == ChromosomeType::X {
                    Genome::modeled(ChromosomeType::X)
                } else {
                    Genome::unmodeled(ChromosomeType::X)
                };
                let y_model = if modeled == ChromosomeType::Y {
                    Genome::modeled(ChromosomeType::Y)
                } else {
                    Genome::unmodeled(ChromosomeType::Y)
                };

                let mut genomes = Vec::with_capacity(2 * size);
                for _ in 0..first_male_index {
                    genomes.push(x_model.clone());
                    genomes.push(x_model.clone());
                }
                for _ in first_male_index..size {
                    genomes.push(x_model.clone());
                    genomes.push(y_model.clone());
                }
                genomes
            }
        };

        Self { genomes }
    }

    /// Number of individuals.
    #[inline]
    pub fn individuals(&self) -> usize {
        self.genomes.len() / 2
    }

    /// Number of genomes (twice the number of individuals).
    #[inline]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// All genomes in individual order.
    #[inline]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Genome `haplotype` (0 or 1) of `individual`.
    #[inline]
    pub fn genome(&self, individual: usize, haplotype: usize) -> Option<&Genome> {
        if haplotype > 1 {
            return None;
        }
        self.genomes.get(2 * individual + haplotype)
    }

    #[inline]
    pub fn genome_mut(&mut self, individual: usize, haplotype: usize) -> Option<&mut Genome> {
        if haplotype > 1 {
            return None;
        }
        self.genomes.get_mut(2 * individual + haplotype)
    }

    /// Both genomes of `individual`.
    #[inline]
    pub fn pair(&self, individual: usize) -> Option<(&Genome, &Genome)> {
        let start = 2 * individual;
        match self.genomes.get(start..start + 2) {
            Some([first, second]) => Some((first, second)),
            _ => None,
        }
    }

    /// Iterate over genome pairs in individual order.
    #[inline]
    pub fn pairs(&self) -> ChunksExact<'_, Genome> {
        self.genomes.chunks_exact(2)
    }

    /// Drop every genome's mutations, keeping the layout and allocations.
    pub fn clear_mutations(&mut self) {
        self.genomes.iter_mut().for_each(Genome::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_male_index_rounds() {
        assert_eq!(first_male_index(10, 0.5, GenerationRole::Parent), Ok(5));
        assert_eq!(first_male_index(10, 0.25, GenerationRole::Parent), Ok(8)); // 7.5 rounds up
        assert_eq!(first_male_index(3, 0.5, GenerationRole::Child), Ok(2)); // 1.5 rounds up
    }

    #[test]
    fn test_first_male_index_no_females() {
        assert_eq!(
            first_male_index(10, 1.0, GenerationRole::Child),
            Err(SubpopulationError::NoFemales {
                role: GenerationRole::Child,
                ratio: 1.0,
                size: 10
            })
        );
        // 0.04 * 10 = 0.4 rounds to zero females
        assert!(matches!(
            first_male_index(10, 0.96, GenerationRole::Parent),
            Err(SubpopulationError::NoFemales { .. })
        ));
    }

    #[test]
    fn test_first_male_index_no_males() {
        assert!(matches!(
            first_male_index(10, 0.0, GenerationRole::Parent),
            Err(SubpopulationError::NoMales { .. })
        ));
        assert!(matches!(
            first_male_index(10, 0.04, GenerationRole::Parent),
            Err(SubpopulationError::NoMales { .. })
        ));
        assert!(matches!(
            first_male_index(1, 0.5, GenerationRole::Parent),
            Err(SubpopulationError::NoMales { .. })
        ));
    }

    #[test]
    fn test_first_male_index_rejects_nan() {
        assert!(matches!(
            first_male_index(10, f64::NAN, GenerationRole::Parent),
            Err(SubpopulationError::InvalidSexRatio { .. })
        ));
    }

    #[test]
    fn test_fit_hermaphrodites() {
        let buffer = GenomeBuffer::fit(7, None);
        assert_eq!(buffer.len(), 14);
        assert_eq!(buffer.individuals(), 7);
        assert!(buffer
            .genomes()
            .iter()
            .all(|g| !g.is_null() && g.chromosome_type() == ChromosomeType::Autosome));
    }

    #[test]
    fn test_fit_sexual_autosomes() {
        let buffer = GenomeBuffer::fit(6, Some((ChromosomeType::Autosome, 3)));
        assert_eq!(buffer.len(), 12);
        assert!(buffer.genomes().iter().all(|g| !g.is_null()));
    }

    #[test]
    fn test_fit_x_modeled() {
        let buffer = GenomeBuffer::fit(4, Some((ChromosomeType::X, 2)));
        assert_eq!(buffer.len(), 8);

        for female in 0..2 {
            let (a, b) = buffer.pair(female).unwrap();
            assert_eq!(a.chromosome_type(), ChromosomeType::X);
            assert_eq!(b.chromosome_type(), ChromosomeType::X);
            assert!(!a.is_null() && !b.is_null());
        }
        for male in 2..4 {
            let (a, b) = buffer.pair(male).unwrap();
            assert_eq!(a.chromosome_type(), ChromosomeType::X);
            assert_eq!(b.chromosome_type(), ChromosomeType::Y);
            assert!(!a.is_null());
            assert!(b.is_null());
        }
    }

    #[test]
    fn test_fit_y_modeled() {
        let buffer = GenomeBuffer::fit(4, Some((ChromosomeType::Y, 1)));

        let (a, b) = buffer.pair(0).unwrap();
        assert!(a.is_null() && b.is_null());

        for male in 1..4 {
            let (x, y) = buffer.pair(male).unwrap();
            assert!(x.is_null());
            assert_eq!(y.chromosome_type(), ChromosomeType::Y);
            assert!(!y.is_null());
        }
    }

    #[test]
    fn test_genome_accessors_bounds() {
        let mut buffer = GenomeBuffer::fit(2, None);
        assert!(buffer.genome(1, 1).is_some());
        assert!(buffer.genome(2, 0).is_none());
        assert!(buffer.genome(0, 2).is_none());
        assert!(buffer.genome_mut(0, 2).is_none());
        assert!(buffer.pair(2).is_none());
        assert_eq!(buffer.pairs().count(), 2);
    }

    #[test]
    fn test_sex_config_defaults() {
        let config: SexConfig = serde_json::from_str(r#"{"sex_ratio": 0.5}"#).unwrap();
        assert_eq!(config.modeled_chromosome, ChromosomeType::Autosome);
        assert_eq!(config.x_dominance_coeff, 1.0);
    }
}
