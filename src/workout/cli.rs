use clap::{Args, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum WorkoutCommands {
    /// Generate a randomized multi-day workout plan spreadsheet
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Exercise table (CSV with category, energy and movement flag columns)
    #[arg(value_hint = ValueHint::FilePath)]
    pub exercises: PathBuf,

    /// Number of workout days; defaults to the configured value
    #[arg(short = 'n', long)]
    pub days: Option<usize>,

    /// Seed for reproducible plans
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for the timestamped plan file
    #[arg(short = 'o', long = "out-dir", value_hint = ValueHint::DirPath, default_value = ".")]
    pub out_dir: PathBuf,

    /// Workout config file (defaults to the user config directory)
    #[arg(short = 'c', long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Also print the generated plan
    #[arg(long)]
    pub print: bool,
}
