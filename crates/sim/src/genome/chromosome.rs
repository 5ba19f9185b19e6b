use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of chromosome a genome represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromosomeType {
    #[default]
    Autosome,
    X,
    Y,
}

impl fmt::Display for ChromosomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Autosome => write!(f, "autosome"),
            Self::X => write!(f, "X chromosome"),
            Self::Y => write!(f, "Y chromosome"),
        }
    }
}

/// Sex of an individual. Hermaphrodites are used when sex is not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Hermaphrodite,
    Female,
    Male,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hermaphrodite => write!(f, "hermaphrodite"),
            Self::Female => write!(f, "female"),
            Self::Male => write!(f, "male"),
        }
    }
}

/// Which of a subpopulation's two generations a value describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationRole {
    Parent,
    Child,
}

impl fmt::Display for GenerationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => write!(f, "parent"),
            Self::Child => write!(f, "child"),
        }
    }
}
