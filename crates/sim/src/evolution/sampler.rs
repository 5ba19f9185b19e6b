//! Fitness-weighted parent samplers.
//!
//! Samplers are rebuilt wholesale from the fitness vector every generation;
//! there is no incremental update. A sampler whose weights are all zero (or
//! that covers no individuals) is still valid but cannot produce a draw.

use rand::distr::weighted::{Error as WeightError, WeightedIndex};
use rand::distr::Distribution;
use rand::Rng;

use crate::base::FitnessValue;
use crate::errors::SamplerError;
use crate::genome::Sex;

/// Weighted sampler over a contiguous range of parent indices.
#[derive(Debug, Clone)]
pub struct ParentSampler {
    index: Option<WeightedIndex<f64>>,
    offset: usize,
    len: usize,
}

impl ParentSampler {
    /// Build a sampler over `weights`, where `weights[k]` belongs to parent
    /// `offset + k`.
    ///
    /// # Errors
    /// Returns [`SamplerError::InvalidWeights`] for NaN weights or an
    /// overflowing total. Zero weights are legal.
    pub fn new(weights: &[FitnessValue], offset: usize) -> Result<Self, SamplerError> {
        let index = match WeightedIndex::new(weights.iter().map(|w| w.get())) {
            Ok(index) => Some(index),
            Err(WeightError::InvalidInput | WeightError::InsufficientNonZero) => None,
            Err(e) => return Err(SamplerError::InvalidWeights(e)),
        };

        Ok(Self {
            index,
            offset,
            len: weights.len(),
        })
    }

    /// Equal weights over `len` parents starting at `offset`.
    pub fn uniform(offset: usize, len: usize) -> Self {
        let index = WeightedIndex::new(std::iter::repeat(1.0).take(len)).ok();
        Self { index, offset, len }
    }

    /// Draw an absolute parent index, or `None` if no parent has positive weight.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        self.index
            .as_ref()
            .map(|index| self.offset + index.sample(rng))
    }

    /// Whether at least one parent can be drawn.
    #[inline]
    pub fn is_viable(&self) -> bool {
        self.index.is_some()
    }

    /// First parent index covered by this sampler.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of parents covered, including those with zero weight.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The samplers of one parent generation.
#[derive(Debug, Clone)]
pub enum ParentSamplers {
    /// One sampler over every individual.
    Hermaphrodite(ParentSampler),
    /// Females `[0, first_male_index)` and males `[first_male_index, size)`.
    Sexual {
        female: ParentSampler,
        male: ParentSampler,
    },
}

impl ParentSamplers {
    /// Build samplers from per-individual fitness.
    ///
    /// `first_male_index` splits the fitness vector into female and male ranges;
    /// `None` builds a single hermaphrodite sampler.
    pub fn build(
        fitness: &[FitnessValue],
        first_male_index: Option<usize>,
    ) -> Result<Self, SamplerError> {
        match first_male_index {
            None => Ok(Self::Hermaphrodite(ParentSampler::new(fitness, 0)?)),
            Some(boundary) => {
                let (females, males) = fitness.split_at(boundary.min(fitness.len()));
                Ok(Self::Sexual {
                    female: ParentSampler::new(females, 0)?,
                    male: ParentSampler::new(males, boundary)?,
                })
            }
        }
    }

    /// Equal-weight samplers for `size` individuals.
    pub fn uniform(size: usize, first_male_index: Option<usize>) -> Self {
        match first_male_index {
            None => Self::Hermaphrodite(ParentSampler::uniform(0, size)),
            Some(boundary) => Self::Sexual {
                female: ParentSampler::uniform(0, boundary),
                male: ParentSampler::uniform(boundary, size.saturating_sub(boundary)),
            },
        }
    }

    /// The sampler for parents of `sex`, if that sex exists in this configuration.
    pub fn get(&self, sex: Sex) -> Option<&ParentSampler> {
        match (self, sex) {
            (Self::Hermaphrodite(sampler), Sex::Hermaphrodite) => Some(sampler),
            (Self::Sexual { female, .. }, Sex::Female) => Some(female),
            (Self::Sexual { male, .. }, Sex::Male) => Some(male),
            _ => None,
        }
    }

    /// Iterate over `(sex, sampler)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Sex, &ParentSampler)> {
        let pairs: [Option<(Sex, &ParentSampler)>; 2] = match self {
            Self::Hermaphrodite(sampler) => [Some((Sex::Hermaphrodite, sampler)), None],
            Self::Sexual { female, male } => [Some((Sex::Female, female)), Some((Sex::Male, male))],
        };
        pairs.into_iter().flatten()
    }
}
