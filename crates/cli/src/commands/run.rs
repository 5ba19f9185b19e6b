use anyhow::{Context, Result};
use fwdsel_sim::simulation::{Simulation, SimulationConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

use crate::args::RunArgs;
use crate::printing::{print_parameters, print_stats};

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    println!("🧬 fwdsel - Running Simulation");
    println!("============================================");

    let mut config = SimulationConfig::from_path(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    tracing::info!(path = %args.config.display(), "loaded configuration");

    // Apply overrides
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(generations) = args.generations {
        config.generations = generations;
    }

    print_parameters(&config);

    let started = Instant::now();
    let mut sim = Simulation::new(config).context("Failed to initialize simulation")?;
    let total_generations = sim.config().generations;

    println!("\nRunning {total_generations} generations...");

    let pb = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new(total_generations as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    };

    for generation in 1..=total_generations {
        sim.step()
            .with_context(|| format!("Generation {generation} failed"))?;

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    sim.evaluate_fitness();

    println!("\n✓ Simulation complete!");
    println!("  Final generation: {}", sim.generation());
    print_stats(&sim.stats());

    if args.time {
        println!("\n⏱  Elapsed: {:.3} s", started.elapsed().as_secs_f64());
    }

    Ok(())
}
