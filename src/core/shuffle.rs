//! core/shuffle.rs — shuffle-sum trials and the exact-outcome histogram.
//!
//! A fixed operand multiset is permuted uniformly at random, summed left
//! to right in `f32`, and the exact resulting bit pattern is tallied. The
//! decimal multiset (powers of ten) sums to 10000 on paper but scatters
//! across nearby representables depending on order; the binary multiset
//! (powers of two) sums to exactly 128 in every order. The contrast
//! between the two is the point of the experiment.

use clap::ValueEnum;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which operand multiset the trials sum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum MultisetMode {
    /// 9 each of 10^-3..10^3 plus one extra 0.001 (64 values, total 10000).
    #[default]
    Decimal,
    /// 8 each of 2^-4..2^3 plus one extra 0.5 (65 values, total 128).
    Binary,
}

/// Build the operand multiset for `mode`. Order carries no meaning; the
/// trials shuffle it before every summation.
pub fn build_multiset(mode: MultisetMode) -> Vec<f32> {
    let mut xs = Vec::new();
    match mode {
        MultisetMode::Decimal => {
            for _ in 0..9 {
                xs.extend_from_slice(&[0.001, 0.01, 0.1, 1.0, 10.0, 100.0, 1000.0]);
            }
            xs.push(0.001); // one extra to round the total up to 10000
        }
        MultisetMode::Binary => {
            for _ in 0..8 {
                xs.extend_from_slice(&[0.0625, 0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0]);
            }
            xs.push(0.5); // one extra to round the total up to 128
        }
    }
    xs
}

/// Strict left-to-right `f32` accumulation.
pub fn sum_in_order(xs: &[f32]) -> f32 {
    xs.iter().fold(0.0f32, |acc, &v| acc + v)
}

/// `f32` keyed by exact bit pattern: equality via `to_bits`, order via
/// `total_cmp`, so `-0.0` and `0.0` are distinct keys and iteration is
/// numerically ascending.
#[derive(Debug, Clone, Copy)]
pub struct ExactF32(pub f32);

impl PartialEq for ExactF32 {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for ExactF32 {}

impl PartialOrd for ExactF32 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for ExactF32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Exact-key frequency table over trial outcomes.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    counts: BTreeMap<ExactF32, u64>,
    trials: u64,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: f32) {
        *self.counts.entry(ExactF32(outcome)).or_insert(0) += 1;
        self.trials += 1;
    }

    /// Total trials recorded; every trial lands in exactly one bucket, so
    /// entry counts sum back to this.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries ascending by key.
    pub fn entries(&self) -> impl Iterator<Item = (f32, u64)> + '_ {
        self.counts.iter().map(|(k, &count)| (k.0, count))
    }

    /// Most frequent outcome, if any trials were recorded.
    pub fn most_frequent(&self) -> Option<(f32, u64)> {
        self.counts
            .iter()
            .max_by_key(|&(_, &count)| count)
            .map(|(k, &count)| (k.0, count))
    }

    /// Share of trials in a bucket, as a percentage of the total.
    pub fn percentage(&self, count: u64) -> f64 {
        100.0 * count as f64 / self.trials as f64
    }
}

/// Run `trials` shuffle-sum trials over the `mode` multiset. Fisher–Yates
/// via `SliceRandom::shuffle`, so every permutation is equally likely.
pub fn run_trials<R: Rng + ?Sized>(mode: MultisetMode, trials: u64, rng: &mut R) -> Histogram {
    let mut xs = build_multiset(mode);
    let mut hist = Histogram::new();
    for _ in 0..trials {
        xs.shuffle(rng);
        hist.record(sum_in_order(&xs));
    }
    hist
}
