// Entry point: load config, apply CLI overrides, run the selected experiments.
use std::error::Error;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nonassoc::cli::{Args, ExperimentSelect};
use nonassoc::config::ExperimentsConfig;
use nonassoc::core::grouping::run_sweep;
use nonassoc::core::oracle::Oracle;
use nonassoc::core::shuffle::run_trials;
use nonassoc::report;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = ExperimentsConfig::load_or_default(&args.config).apply_args(&args);

    if matches!(args.experiment, ExperimentSelect::Sweep | ExperimentSelect::All) {
        let oracle = cfg
            .sweep
            .oracle
            .then(|| Oracle::new(cfg.sweep.oracle_prec_bits, cfg.sweep.oracle_rounding))
            .transpose()?;
        info!(
            variant = ?cfg.sweep.variant,
            oracle = cfg.sweep.oracle,
            "running grouped-sum sweep"
        );
        let rows = run_sweep(cfg.sweep.variant, oracle.as_ref())?;
        report::print_sweep(&rows);
    }

    if matches!(args.experiment, ExperimentSelect::Shuffle | ExperimentSelect::All) {
        info!(
            mode = ?cfg.shuffle.mode,
            trials = cfg.shuffle.trials,
            "running shuffle-sum histogram"
        );
        let mut rng = rand::rng();
        let hist = run_trials(cfg.shuffle.mode, cfg.shuffle.trials, &mut rng);
        report::print_histogram(&hist);
    }

    Ok(())
}
