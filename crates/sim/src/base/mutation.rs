use std::fmt;
use std::sync::Arc;

use rand::Rng;
use rand_distr::{Distribution, Exp, Gamma, Normal};
use serde::{Deserialize, Serialize};

use crate::errors::MutationError;

/// Distribution of fitness effects for new mutations of one type.
///
/// Signed means are supported for the exponential and gamma variants: the
/// magnitude is drawn from the distribution with mean `|mean|` and the sign of
/// `mean` is applied afterwards, so `mean = -0.01` gives deleterious effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FitnessEffects {
    /// Every new mutation has the same selection coefficient.
    Fixed { s: f64 },
    /// Exponentially distributed selection coefficients.
    Exponential { mean: f64 },
    /// Gamma distributed selection coefficients.
    Gamma { mean: f64, shape: f64 },
    /// Normally distributed selection coefficients.
    Normal { mean: f64, sd: f64 },
}

impl FitnessEffects {
    /// Check that the distribution can be sampled.
    pub fn validate(&self, id: u32) -> Result<(), MutationError> {
        let invalid = |reason: String| MutationError::InvalidEffects { id, reason };
        match *self {
            FitnessEffects::Fixed { s } if !s.is_finite() => {
                Err(invalid(format!("selection coefficient {s} is not finite")))
            }
            FitnessEffects::Exponential { mean } if !mean.is_finite() || mean == 0.0 => {
                Err(invalid(format!("exponential mean {mean} must be finite and non-zero")))
            }
            FitnessEffects::Gamma { mean, shape }
                if !mean.is_finite() || mean == 0.0 || !(shape > 0.0) || !shape.is_finite() =>
            {
                Err(invalid(format!(
                    "gamma mean {mean} must be finite and non-zero and shape {shape} positive"
                )))
            }
            FitnessEffects::Normal { mean, sd } if !mean.is_finite() || !(sd >= 0.0) => {
                Err(invalid(format!(
                    "normal mean {mean} must be finite and sd {sd} non-negative"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Draw one selection coefficient.
    ///
    /// Callers validate the distribution first; an invalid one falls back to a
    /// neutral coefficient.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            FitnessEffects::Fixed { s } => s,
            FitnessEffects::Exponential { mean } => Exp::new(1.0 / mean.abs())
                .map(|d| d.sample(rng).copysign(mean))
                .unwrap_or(0.0),
            FitnessEffects::Gamma { mean, shape } => Gamma::new(shape, mean.abs() / shape)
                .map(|d| d.sample(rng).copysign(mean))
                .unwrap_or(0.0),
            FitnessEffects::Normal { mean, sd } => Normal::new(mean, sd)
                .map(|d| d.sample(rng))
                .unwrap_or(0.0),
        }
    }
}

/// A mutation-type descriptor shared by every mutation of that type.
///
/// Two mutations are "the same allele" for homozygosity purposes only if they
/// point at the same `MutationType` allocation (compare with [`Arc::ptr_eq`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationType {
    id: u32,
    dominance_coeff: f64,
    effects: FitnessEffects,
}

impl MutationType {
    /// Create a new mutation type.
    ///
    /// # Errors
    /// Returns an error if the distribution of fitness effects is invalid or
    /// the dominance coefficient is not finite.
    pub fn new(id: u32, dominance_coeff: f64, effects: FitnessEffects) -> Result<Self, MutationError> {
        if !dominance_coeff.is_finite() {
            return Err(MutationError::InvalidEffects {
                id,
                reason: format!("dominance coefficient {dominance_coeff} is not finite"),
            });
        }
        effects.validate(id)?;
        Ok(Self {
            id,
            dominance_coeff,
            effects,
        })
    }

    /// A neutral type with fixed `s = 0`.
    pub fn neutral(id: u32) -> Self {
        Self {
            id,
            dominance_coeff: 0.5,
            effects: FitnessEffects::Fixed { s: 0.0 },
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Dominance coefficient applied when a mutation of this type is heterozygous.
    #[inline]
    pub fn dominance_coeff(&self) -> f64 {
        self.dominance_coeff
    }

    #[inline]
    pub fn effects(&self) -> &FitnessEffects {
        &self.effects
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.id)
    }
}

/// An immutable mutation record.
///
/// Genomes hold `Arc<Mutation>` handles, so a record is shared by every
/// descendant genome and freed once the last one drops it.
#[derive(Debug, Clone)]
pub struct Mutation {
    id: u64,
    position: u64,
    selection_coeff: f64,
    mutation_type: Arc<MutationType>,
    origin_generation: usize,
}

impl Mutation {
    pub fn new(
        id: u64,
        position: u64,
        selection_coeff: f64,
        mutation_type: Arc<MutationType>,
        origin_generation: usize,
    ) -> Self {
        Self {
            id,
            position,
            selection_coeff,
            mutation_type,
            origin_generation,
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[inline]
    pub fn selection_coeff(&self) -> f64 {
        self.selection_coeff
    }

    #[inline]
    pub fn mutation_type(&self) -> &Arc<MutationType> {
        &self.mutation_type
    }

    /// Generation in which the mutation arose.
    #[inline]
    pub fn origin_generation(&self) -> usize {
        self.origin_generation
    }

    /// Whether `other` expresses as the same allele: same type descriptor and
    /// equal selection coefficient. The records themselves may differ.
    #[inline]
    pub fn is_same_allele(&self, other: &Mutation) -> bool {
        Arc::ptr_eq(&self.mutation_type, &other.mutation_type)
            && self.selection_coeff == other.selection_coeff
    }

    /// Fitness factor when this mutation is present on one haplotype only.
    #[inline]
    pub fn heterozygous_factor(&self) -> f64 {
        1.0 + self.mutation_type.dominance_coeff * self.selection_coeff
    }

    /// Fitness factor when this mutation is present on both haplotypes.
    #[inline]
    pub fn homozygous_factor(&self) -> f64 {
        1.0 + self.selection_coeff
    }
}
