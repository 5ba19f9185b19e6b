use anyhow::{Context, Result};
use fwdsel_sim::simulation::SimulationConfig;
use std::path::PathBuf;

pub fn write_template(output: Option<&PathBuf>) -> Result<()> {
    let json = SimulationConfig::example().to_json_pretty()?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Example configuration written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
