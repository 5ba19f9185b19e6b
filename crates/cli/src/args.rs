use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Override random seed (default: use configured seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override number of generations (default: use configured value)
    #[arg(short = 'g', long)]
    pub generations: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Report elapsed wall-clock time
    #[arg(long)]
    pub time: bool,
}
