use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::cli::Args;
use crate::core::grouping::SweepVariant;
use crate::core::oracle::RoundingMode;
use crate::core::shuffle::MultisetMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub variant: SweepVariant,
    #[serde(default = "SweepConfig::default_oracle")]
    pub oracle: bool,
    /// Oracle significand width in bits. The default matches the reference
    /// cross-check precision; low enough that grouping divergence is visible
    /// well inside the swept range.
    #[serde(default = "SweepConfig::default_oracle_prec_bits")]
    pub oracle_prec_bits: u32,
    #[serde(default)]
    pub oracle_rounding: RoundingMode,
}

impl SweepConfig {
    fn default_oracle() -> bool {
        false
    }
    fn default_oracle_prec_bits() -> u32 {
        16
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            variant: SweepVariant::default(),
            oracle: Self::default_oracle(),
            oracle_prec_bits: Self::default_oracle_prec_bits(),
            oracle_rounding: RoundingMode::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuffleConfig {
    #[serde(default)]
    pub mode: MultisetMode,
    #[serde(default = "ShuffleConfig::default_trials")]
    pub trials: u64,
}

impl ShuffleConfig {
    fn default_trials() -> u64 {
        1_000_000
    }
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            mode: MultisetMode::default(),
            trials: Self::default_trials(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentsConfig {
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub shuffle: ShuffleConfig,
}

impl ExperimentsConfig {
    /// Read the config file if it exists; fall back to defaults on a missing
    /// file or a parse failure (with a warning, never a hard error).
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if !path_obj.exists() {
            return Self::default();
        }
        match fs::read_to_string(path_obj) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("failed to parse config {path}: {err}; using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                warn!("failed to read config {path}: {err}; using defaults");
                Self::default()
            }
        }
    }

    /// CLI flags win over file values.
    pub fn apply_args(mut self, args: &Args) -> Self {
        if let Some(variant) = args.sweep {
            self.sweep.variant = variant;
        }
        if let Some(oracle) = args.oracle {
            self.sweep.oracle = oracle;
        }
        if let Some(mode) = args.mode {
            self.shuffle.mode = mode;
        }
        if let Some(trials) = args.trials {
            self.shuffle.trials = trials;
        }
        self
    }
}
