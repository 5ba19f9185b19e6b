use std::fmt;
use std::iter::Sum;
use std::ops::{Mul, MulAssign};

use serde::{Deserialize, Serialize};

/// A non-negative multiplicative fitness value.
///
/// Fitness is a product of per-mutation factors `1 + s` (or `1 + h·s`), so it is
/// unbounded above; anything that would go to zero or below is clamped to
/// [`FitnessValue::LETHAL_FITNESS`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FitnessValue(f64);

impl FitnessValue {
    /// Fitness of an individual with no selected mutations.
    pub const NEUTRAL_FITNESS: Self = Self(1.0);

    /// Fitness of an individual that can never be drawn as a parent.
    pub const LETHAL_FITNESS: Self = Self(0.0);

    /// Creates a new FitnessValue, clamping negative input to 0.0.
    ///
    /// NaN passes through unchanged so that it surfaces when a sampler is built.
    pub fn new(value: f64) -> Self {
        if value <= 0.0 {
            Self::LETHAL_FITNESS
        } else {
            Self(value)
        }
    }

    /// Returns the inner f64 value.
    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Returns true if this value can never be drawn.
    #[inline]
    pub fn is_lethal(self) -> bool {
        self.0 == 0.0
    }
}

impl From<FitnessValue> for f64 {
    fn from(fitness: FitnessValue) -> Self {
        fitness.0
    }
}

impl From<f64> for FitnessValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Default for FitnessValue {
    fn default() -> Self {
        Self::NEUTRAL_FITNESS
    }
}

impl fmt::Display for FitnessValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Mul for FitnessValue {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        FitnessValue::new(self.0 * rhs.0)
    }
}

impl MulAssign for FitnessValue {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Sum for FitnessValue {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        FitnessValue::new(iter.map(|f| f.0).sum())
    }
}
