use clap::{Parser, ValueEnum};

use crate::core::grouping::SweepVariant;
use crate::core::shuffle::MultisetMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExperimentSelect {
    Sweep,
    Shuffle,
    All,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Which experiment(s) to run
    #[arg(long, value_enum, default_value = "all")]
    pub experiment: ExperimentSelect,

    /// Operand multiset for the shuffle experiment (overrides config)
    #[arg(long, value_enum)]
    pub mode: Option<MultisetMode>,

    /// Cross-check the sweep with the software float oracle (overrides config)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub oracle: Option<bool>,

    /// Number of shuffle trials (overrides config)
    #[arg(long)]
    pub trials: Option<u64>,

    /// Sweep range: every integer 1..=16 or even integers 2..=32 (overrides config)
    #[arg(long, value_enum)]
    pub sweep: Option<SweepVariant>,

    /// Path to config TOML
    #[arg(long, default_value = "experiments.toml")]
    pub config: String,
}
