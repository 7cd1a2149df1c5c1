//! core/grouping.rs — three-term grouped sums and the reciprocal sweep.
//!
//! Addition over the reals is associative; `f32` addition is not. For
//! `b = 1` and `c = -1`, the groupings `(a+b)+c` and `a+(b+c)` agree only
//! when `a` is a power of two. The sweep drives `a = 1/x` over a range of
//! integers and reports every grouping side by side, optionally computed
//! through the reduced-precision oracle instead of native `f32`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::bin_render::{self, RenderError};
use crate::core::oracle::Oracle;

/// One three-term sum computed under each grouping, at working precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupedSums {
    /// `a + b + c` accumulated left to right.
    pub natural: f32,
    /// `(a + b) + c`.
    pub left: f32,
    /// `a + (b + c)`.
    pub right: f32,
}

impl GroupedSums {
    /// True when all three results are bit-identical. Bit comparison, not
    /// `==`: `0.0` and `-0.0` are distinct outcomes here.
    pub fn agree(&self) -> bool {
        self.natural.to_bits() == self.left.to_bits()
            && self.left.to_bits() == self.right.to_bits()
    }
}

/// Compute all three groupings of `a + b + c` in native `f32`.
pub fn grouped_sums(a: f32, b: f32, c: f32) -> GroupedSums {
    let natural = a + b + c;
    let left = (a + b) + c;
    let right = a + (b + c);
    GroupedSums { natural, left, right }
}

/// Which reciprocals `1/x` the sweep visits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SweepVariant {
    /// Every integer x in 1..=16.
    #[default]
    Unit,
    /// Even integers x in 2..=32.
    Even,
}

impl SweepVariant {
    pub fn xs(self) -> impl Iterator<Item = u32> {
        match self {
            SweepVariant::Unit => (1..=16u32).step_by(1),
            SweepVariant::Even => (2..=32u32).step_by(2),
        }
    }
}

/// One sweep iteration: the operand, its exact binary rendering, the
/// natural sum's rendering, and all three groupings.
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub x: u32,
    pub a: f32,
    pub a_bits: String,
    pub natural_bits: String,
    pub sums: GroupedSums,
    pub agree: bool,
}

/// Run the sweep with `a = 1/x`, `b = 1`, `c = -1`. With an oracle the
/// three sums are carried at oracle precision and narrowed back to `f32`
/// before comparison; oracle state lives only inside the iteration.
pub fn run_sweep(
    variant: SweepVariant,
    oracle: Option<&Oracle>,
) -> Result<Vec<SweepRow>, RenderError> {
    let mut rows = Vec::with_capacity(16);
    for x in variant.xs() {
        let a64 = 1.0 / f64::from(x);
        let (a, sums) = match oracle {
            Some(o) => (o.round_through(a64), o.grouped_sums(a64, 1.0, -1.0)),
            None => {
                let a = a64 as f32;
                (a, grouped_sums(a, 1.0, -1.0))
            }
        };
        let agree = sums.agree();
        rows.push(SweepRow {
            x,
            a,
            a_bits: bin_render::render(a)?,
            natural_bits: bin_render::render(sums.natural)?,
            sums,
            agree,
        });
    }
    Ok(rows)
}
