//! Genome structures: chromosome types, haplotypes and per-generation genome buffers.

mod buffer;
mod chromosome;
mod haplotype;

pub use buffer::{first_male_index, GenomeBuffer, SexConfig};
pub use chromosome::{ChromosomeType, GenerationRole, Sex};
pub use haplotype::Genome;
pub(crate) use haplotype::is_sorted_by_position;
