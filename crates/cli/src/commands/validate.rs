use anyhow::{Context, Result};
use fwdsel_sim::simulation::SimulationConfig;
use std::path::Path;

pub fn validate_config(path: &Path) -> Result<()> {
    println!("🔍 Validating configuration: {}", path.display());

    let config = SimulationConfig::from_path(path)
        .with_context(|| format!("Invalid configuration {}", path.display()))?;

    for subpop in &config.subpopulations {
        subpop
            .build()
            .with_context(|| format!("Subpopulation {} cannot be created", subpop.id))?;
    }

    println!("✓ Configuration is valid");
    println!(
        "  {} subpopulation(s), {} mutation type(s), {} generations",
        config.subpopulations.len(),
        config.mutation_types.len(),
        config.generations
    );
    Ok(())
}
