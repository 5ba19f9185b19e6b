//! Simulation parameters and configuration.
//!
//! A [`SimulationConfig`] fully describes a run: the chromosome, the mutation
//! and recombination processes, the mutation types and the subpopulations. It
//! is read from JSON and validated before a simulation is built from it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::base::{FitnessEffects, MutationType};
use crate::errors::ConfigError;
use crate::evolution::{MutationModel, RecombinationModel};
use crate::genome::{first_male_index, ChromosomeType, GenerationRole, SexConfig};
use crate::simulation::Subpopulation;

/// One mutation type and how often new mutations are of that type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationTypeConfig {
    pub id: u32,
    /// Dominance coefficient for heterozygous expression
    pub dominance_coeff: f64,
    /// Distribution of fitness effects
    pub effects: FitnessEffects,
    /// Relative weight among new mutations
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl MutationTypeConfig {
    pub fn new(id: u32, dominance_coeff: f64, effects: FitnessEffects) -> Self {
        Self {
            id,
            dominance_coeff,
            effects,
            weight: default_weight(),
        }
    }

    /// Set the relative weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Initial state of one subpopulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubpopulationConfig {
    pub id: String,
    /// Number of diploid individuals
    pub size: usize,
    /// Separate sexes; hermaphrodites when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<SexConfig>,
}

impl SubpopulationConfig {
    pub fn new(id: impl Into<String>, size: usize) -> Self {
        Self {
            id: id.into(),
            size,
            sex: None,
        }
    }

    pub fn with_sex(mut self, sex: SexConfig) -> Self {
        self.sex = Some(sex);
        self
    }

    /// Create the subpopulation this entry describes.
    pub fn build(&self) -> Result<Subpopulation, ConfigError> {
        match self.sex {
            None => Ok(Subpopulation::new(self.id.as_str(), self.size)),
            Some(sex) => Subpopulation::new_sexual(self.id.as_str(), self.size, sex)
                .map_err(|e| ConfigError::Validation(format!("subpopulation {}: {e}", self.id))),
        }
    }
}

/// Complete configuration of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Total number of generations to simulate
    pub generations: usize,
    /// Optional RNG seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of positions on the simulated chromosome
    pub chromosome_length: u64,
    /// Per-base, per-generation mutation rate
    #[serde(default)]
    pub mutation_rate: f64,
    /// Per-base, per-generation recombination rate
    #[serde(default)]
    pub recombination_rate: f64,
    #[serde(default)]
    pub mutation_types: Vec<MutationTypeConfig>,
    pub subpopulations: Vec<SubpopulationConfig>,
}

impl SimulationConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration for consistency.
    ///
    /// Everything that would make a later step fail is reported here: bad
    /// rates, invalid fitness effect distributions, duplicate ids, and sex
    /// ratios that leave a subpopulation without females or males.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subpopulations.is_empty() {
            return Err(ConfigError::Validation(
                "at least one subpopulation is required".into(),
            ));
        }

        let mut type_ids = HashSet::new();
        for t in &self.mutation_types {
            if !type_ids.insert(t.id) {
                return Err(ConfigError::Validation(format!(
                    "duplicate mutation type id {}",
                    t.id
                )));
            }
        }

        let mut subpop_ids = HashSet::new();
        for subpop in &self.subpopulations {
            if subpop.id.is_empty() {
                return Err(ConfigError::Validation(
                    "subpopulation id must not be empty".into(),
                ));
            }
            if !subpop_ids.insert(subpop.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate subpopulation id {}",
                    subpop.id
                )));
            }
            if subpop.size == 0 {
                return Err(ConfigError::Validation(format!(
                    "subpopulation {} must have at least one individual",
                    subpop.id
                )));
            }
            if let Some(sex) = &subpop.sex {
                if !sex.x_dominance_coeff.is_finite() {
                    return Err(ConfigError::Validation(format!(
                        "subpopulation {}: X dominance coefficient {} is not finite",
                        subpop.id, sex.x_dominance_coeff
                    )));
                }
                first_male_index(subpop.size, sex.sex_ratio, GenerationRole::Parent).map_err(
                    |e| ConfigError::Validation(format!("subpopulation {}: {e}", subpop.id)),
                )?;
            }
        }

        self.mutation_model()?;
        self.recombination_model()?;
        Ok(())
    }

    /// Build the mutation model, creating one shared descriptor per type.
    pub fn mutation_model(&self) -> Result<MutationModel, ConfigError> {
        let types = self
            .mutation_types
            .iter()
            .map(|t| {
                MutationType::new(t.id, t.dominance_coeff, t.effects.clone()).map(|m| (m, t.weight))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        MutationModel::new(self.mutation_rate, self.chromosome_length, types)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    pub fn recombination_model(&self) -> Result<RecombinationModel, ConfigError> {
        RecombinationModel::new(self.recombination_rate, self.chromosome_length)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Example configuration: one hermaphroditic and one X-modeled subpopulation.
    pub fn example() -> Self {
        Self {
            generations: 1_000,
            seed: Some(42),
            chromosome_length: 100_000,
            mutation_rate: 1e-7,
            recombination_rate: 1e-8,
            mutation_types: vec![
                MutationTypeConfig::new(1, 0.5, FitnessEffects::Fixed { s: 0.0 }),
                MutationTypeConfig::new(
                    2,
                    0.1,
                    FitnessEffects::Gamma {
                        mean: -0.01,
                        shape: 0.3,
                    },
                )
                .with_weight(0.3),
            ],
            subpopulations: vec![
                SubpopulationConfig::new("p1", 500),
                SubpopulationConfig::new("p2", 200).with_sex(SexConfig::new(
                    0.5,
                    ChromosomeType::X,
                    1.0,
                )),
            ],
        }
    }
}
