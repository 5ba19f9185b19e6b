use fwdsel_sim::base::FitnessEffects;
use fwdsel_sim::simulation::{SimulationConfig, SubpopulationStats};

pub fn print_parameters(config: &SimulationConfig) {
    println!("\n📋 Simulation Configuration");
    println!("  • Generations: {} [-g, --generations]", config.generations);
    if let Some(seed) = config.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }

    println!("\n🧬 Chromosome");
    println!("  • Length: {} positions", config.chromosome_length);
    println!("  • Mutation Rate: {:.2e} per base per generation", config.mutation_rate);
    println!(
        "  • Recombination Rate: {:.2e} per base per generation",
        config.recombination_rate
    );

    if !config.mutation_types.is_empty() {
        println!("\n⚡ Mutation Types");
        for t in &config.mutation_types {
            println!(
                "  • m{}: h = {}, weight = {}, {}",
                t.id,
                t.dominance_coeff,
                t.weight,
                describe_effects(&t.effects)
            );
        }
    }

    println!("\n👥 Subpopulations");
    for subpop in &config.subpopulations {
        match &subpop.sex {
            None => println!("  • {}: {} hermaphrodites", subpop.id, subpop.size),
            Some(sex) => println!(
                "  • {}: {} individuals, sex ratio {}, modeling {} (X dominance {})",
                subpop.id, subpop.size, sex.sex_ratio, sex.modeled_chromosome, sex.x_dominance_coeff
            ),
        }
    }
}

fn describe_effects(effects: &FitnessEffects) -> String {
    match effects {
        FitnessEffects::Fixed { s } => format!("fixed s = {s}"),
        FitnessEffects::Exponential { mean } => format!("exponential, mean s = {mean}"),
        FitnessEffects::Gamma { mean, shape } => format!("gamma, mean s = {mean}, shape = {shape}"),
        FitnessEffects::Normal { mean, sd } => format!("normal, mean s = {mean}, sd = {sd}"),
    }
}

pub fn print_stats(stats: &[SubpopulationStats]) {
    println!("\n📊 Final State");
    for s in stats {
        println!("  • {} (size {})", s.id, s.size);
        if let Some(first_male) = s.first_male_index {
            println!("    - Females: {first_male}, Males: {}", s.size - first_male);
        }
        match s.mean_fitness {
            Some(w) => println!("    - Mean fitness: {w:.6}"),
            None => println!("    - Mean fitness: not evaluated"),
        }
        println!("    - Segregating mutations: {}", s.segregating_mutations);
        println!(
            "    - Mutations per genome: {:.3}",
            s.mean_mutations_per_genome
        );
    }
}
