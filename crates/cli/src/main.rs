mod args;
mod commands;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use args::RunArgs;
use commands::{run, template, validate};

/// fwdsel: forward-time simulation of diploid populations under selection
///
/// Each individual carries two genomes of mutations; fitness is multiplicative
/// over those mutations and parents are drawn in proportion to fitness.
#[derive(Parser, Debug)]
#[command(name = "fwdsel")]
#[command(author, version, about = "Forward-time simulation of diploid populations under selection", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Increase log verbosity (-v for info, -vv for debug)
    ///
    /// RUST_LOG, when set, takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulation described by a JSON configuration.
    Run(RunArgs),

    /// Check a configuration without running it.
    ///
    /// Reports the first problem found, such as a sex ratio that leaves a
    /// subpopulation without females or males.
    Validate {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print an example configuration to start from.
    Template {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Run(args) => {
            run::run_simulation(&args)?;
        }
        Commands::Validate { config } => {
            validate::validate_config(&config)?;
        }
        Commands::Template { output } => {
            template::write_template(output.as_ref())?;
        }
    }

    Ok(())
}
