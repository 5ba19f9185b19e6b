//! Diploid fitness of an individual from the mutations on its two genomes.
//!
//! Fitness is multiplicative across mutations. A mutation carried on one
//! haplotype only contributes `1 + h·s`, where `h` is the dominance coefficient
//! of its mutation type; a mutation present on both haplotypes (same mutation
//! type, same selection coefficient, at the same position) contributes
//! `1 + s`. Mutations on an unpaired chromosome are hemizygous: `1 + s`, or
//! `1 + h_X·s` for an X chromosome where `h_X` is the subpopulation's X
//! dominance coefficient.
//!
//! Fitness cannot recover once the running product reaches zero, so every
//! evaluator stops as soon as that happens and reports lethal fitness.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::base::{FitnessValue, Mutation};
use crate::genome::{ChromosomeType, Genome};

/// Trait for scoring fitness of a diploid individual from its two genomes.
///
/// Implementors must return a non-negative value and must be symmetric in the
/// two genomes.
pub trait DiploidFitness {
    /// Calculate fitness of the individual carrying `genome1` and `genome2`.
    fn diploid_fitness(&self, genome1: &Genome, genome2: &Genome) -> FitnessValue;
}

/// Multiplicative fitness with per-type dominance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplicativeFitness {
    /// Dominance coefficient for mutations on an unpaired X chromosome.
    pub x_dominance_coeff: f64,
}

impl MultiplicativeFitness {
    pub fn new(x_dominance_coeff: f64) -> Self {
        Self { x_dominance_coeff }
    }

    /// Fitness of a single genome whose partner is not modeled.
    fn hemizygous(&self, genome: &Genome) -> FitnessValue {
        let mut w = 1.0;
        let x_linked = genome.chromosome_type() == ChromosomeType::X;

        for mutation in genome.mutations() {
            let s = mutation.selection_coeff();
            if s == 0.0 {
                continue;
            }
            w *= if x_linked {
                1.0 + self.x_dominance_coeff * s
            } else {
                1.0 + s
            };
            if w <= 0.0 {
                return FitnessValue::LETHAL_FITNESS;
            }
        }

        FitnessValue::new(w)
    }

    /// Fitness of two modeled genomes by a merge over their position-sorted
    /// mutation lists.
    fn diploid(&self, a: &[Arc<Mutation>], b: &[Arc<Mutation>]) -> FitnessValue {
        let mut w = 1.0;
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            let (pos_a, pos_b) = (a[i].position(), b[j].position());
            match pos_a.cmp(&pos_b) {
                Ordering::Less => {
                    if !apply_heterozygous(&mut w, &a[i]) {
                        return FitnessValue::LETHAL_FITNESS;
                    }
                    i += 1;
                }
                Ordering::Greater => {
                    if !apply_heterozygous(&mut w, &b[j]) {
                        return FitnessValue::LETHAL_FITNESS;
                    }
                    j += 1;
                }
                Ordering::Equal => {
                    let run_a = tied_run(&a[i..], pos_a);
                    let run_b = tied_run(&b[j..], pos_b);
                    if !apply_tied_runs(&mut w, run_a, run_b) {
                        return FitnessValue::LETHAL_FITNESS;
                    }
                    i += run_a.len();
                    j += run_b.len();
                }
            }
        }

        // No counterparts remain on the exhausted side
        for mutation in a[i..].iter().chain(&b[j..]) {
            if !apply_heterozygous(&mut w, mutation) {
                return FitnessValue::LETHAL_FITNESS;
            }
        }

        FitnessValue::new(w)
    }
}

impl Default for MultiplicativeFitness {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DiploidFitness for MultiplicativeFitness {
    fn diploid_fitness(&self, genome1: &Genome, genome2: &Genome) -> FitnessValue {
        match (genome1.is_null(), genome2.is_null()) {
            (true, true) => FitnessValue::NEUTRAL_FITNESS,
            (false, true) => self.hemizygous(genome1),
            (true, false) => self.hemizygous(genome2),
            (false, false) => self.diploid(genome1.mutations(), genome2.mutations()),
        }
    }
}

/// Leading mutations of `mutations` that sit at `position`.
#[inline]
fn tied_run(mutations: &[Arc<Mutation>], position: u64) -> &[Arc<Mutation>] {
    let len = mutations
        .iter()
        .take_while(|m| m.position() == position)
        .count();
    &mutations[..len]
}

/// Multiply in a heterozygous factor. Returns false once fitness is non-positive.
#[inline]
fn apply_heterozygous(w: &mut f64, mutation: &Mutation) -> bool {
    if mutation.selection_coeff() != 0.0 {
        *w *= mutation.heterozygous_factor();
    }
    *w > 0.0
}

/// Apply two runs of mutations sharing one position.
///
/// Each mutation in `run_a` pairs with at most one unclaimed same-allele
/// mutation in `run_b` and is then homozygous; the rest of either run is
/// heterozygous. Pairing one-to-one keeps the result independent of which
/// genome is called `a`. Returns false once fitness is non-positive.
fn apply_tied_runs(w: &mut f64, run_a: &[Arc<Mutation>], run_b: &[Arc<Mutation>]) -> bool {
    // Runs are almost always a single mutation each
    if let ([m_a], [m_b]) = (run_a, run_b) {
        if m_a.is_same_allele(m_b) {
            if m_a.selection_coeff() != 0.0 {
                *w *= m_a.homozygous_factor();
            }
            return *w > 0.0;
        }
        return apply_heterozygous(w, m_a) && apply_heterozygous(w, m_b);
    }

    let mut claimed = vec![false; run_b.len()];

    for m_a in run_a {
        let partner = run_b
            .iter()
            .enumerate()
            .position(|(k, m_b)| !claimed[k] && m_a.is_same_allele(m_b));

        match partner {
            Some(k) => {
                claimed[k] = true;
                if m_a.selection_coeff() != 0.0 {
                    *w *= m_a.homozygous_factor();
                }
                if *w <= 0.0 {
                    return false;
                }
            }
            None => {
                if !apply_heterozygous(w, m_a) {
                    return false;
                }
            }
        }
    }

    for (k, m_b) in run_b.iter().enumerate() {
        if !claimed[k] && !apply_heterozygous(w, m_b) {
            return false;
        }
    }

    true
}
