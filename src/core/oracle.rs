//! core/oracle.rs — software float cross-check at an explicit precision.
//!
//! The oracle recomputes the grouped sums with a sign/exponent/significand
//! software float whose significand width comes from configuration
//! (default 16 bits, the reference cross-check's working precision) and
//! whose rounding is directed toward negative infinity so every rounding
//! decision is deterministic. Results are narrowed back to `f32` under the
//! same rounding before any comparison. Disagreement between the narrowed
//! groupings is the phenomenon under test, never an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::grouping::GroupedSums;

/// Rounding applied by every oracle operation, including narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Toward negative infinity (directed, reproducible by construction).
    #[default]
    Down,
    /// To nearest, ties to even.
    Nearest,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OracleError {
    #[error("unsupported oracle precision {0} bits (supported: 2..=53)")]
    Precision(u32),
}

/// Arbitrary-width binary float: value = (-1)^neg * mant * 2^exp, with
/// `mant` normalized so its top bit sits at position `prec - 1` (or zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigFloat {
    neg: bool,
    mant: u128,
    exp: i32,
    prec: u32,
}

impl BigFloat {
    fn zero(neg: bool, prec: u32) -> Self {
        BigFloat { neg, mant: 0, exp: 0, prec }
    }

    /// Import a finite `f64`, rounding to `prec` significand bits.
    pub fn from_f64(v: f64, prec: u32, mode: RoundingMode) -> Self {
        let bits = v.to_bits();
        let neg = bits >> 63 == 1;
        let raw_exp = ((bits >> 52) & 0x7ff) as i32;
        let frac = bits & ((1u64 << 52) - 1);
        let (mant, exp) = if raw_exp == 0 {
            (u128::from(frac), -1074)
        } else {
            (u128::from(frac | (1 << 52)), raw_exp - 1075)
        };
        if mant == 0 {
            return Self::zero(neg, prec);
        }
        Self::from_parts(neg, mant, exp, prec, mode)
    }

    /// Normalize `(-1)^neg * mant * 2^exp` to `prec` bits, rounding the
    /// dropped tail per `mode`. Round-down increments the magnitude of
    /// negative values; positive values truncate.
    fn from_parts(neg: bool, mut mant: u128, mut exp: i32, prec: u32, mode: RoundingMode) -> Self {
        debug_assert!(mant != 0);
        let nbits = 128 - mant.leading_zeros();
        if nbits > prec {
            let drop = nbits - prec;
            let lost = mant & ((1u128 << drop) - 1);
            mant >>= drop;
            exp += drop as i32;
            let bump = match mode {
                RoundingMode::Down => neg && lost != 0,
                RoundingMode::Nearest => {
                    let half = 1u128 << (drop - 1);
                    lost > half || (lost == half && mant & 1 == 1)
                }
            };
            if bump {
                mant += 1;
                if mant >> prec != 0 {
                    mant >>= 1;
                    exp += 1;
                }
            }
        } else if nbits < prec {
            mant <<= prec - nbits;
            exp -= (prec - nbits) as i32;
        }
        BigFloat { neg, mant, exp, prec }
    }

    /// Add at the precision of `self`. An exactly-zero sum takes the sign
    /// IEEE-754 prescribes for the rounding direction (negative under Down).
    pub fn add(&self, rhs: &BigFloat, mode: RoundingMode) -> BigFloat {
        let prec = self.prec;
        if self.mant == 0 && rhs.mant == 0 {
            let neg = match mode {
                RoundingMode::Down => self.neg || rhs.neg,
                RoundingMode::Nearest => self.neg && rhs.neg,
            };
            return Self::zero(neg, prec);
        }
        if self.mant == 0 {
            return Self::from_parts(rhs.neg, rhs.mant, rhs.exp, prec, mode);
        }
        if rhs.mant == 0 {
            return Self::from_parts(self.neg, self.mant, self.exp, prec, mode);
        }

        // Equal prec on both sides means LSB-exponent order is magnitude order.
        let (a, b) = if self.exp >= rhs.exp { (self, rhs) } else { (rhs, self) };
        let shift = (a.exp - b.exp) as u32;

        if shift > 127 - prec {
            // b lies entirely below a's rounding range; fold it into a
            // sticky bit two guard positions down.
            let m = a.mant << 2;
            let m = if a.neg == b.neg { m | 1 } else { m - 1 };
            return Self::from_parts(a.neg, m, a.exp - 2, prec, mode);
        }

        let am = a.mant << shift;
        let bm = b.mant;
        let (neg, mag) = if a.neg == b.neg {
            (a.neg, am + bm)
        } else if am >= bm {
            (a.neg, am - bm)
        } else {
            (b.neg, bm - am)
        };
        if mag == 0 {
            return Self::zero(matches!(mode, RoundingMode::Down), prec);
        }
        Self::from_parts(neg, mag, b.exp, prec, mode)
    }

    /// Exact for `prec <= 53`; the `Oracle` constructor enforces that.
    pub fn to_f64(&self) -> f64 {
        if self.mant == 0 {
            return if self.neg { -0.0 } else { 0.0 };
        }
        let v = self.mant as f64 * 2.0f64.powi(self.exp);
        if self.neg { -v } else { v }
    }

    /// Narrow to working precision under `mode`.
    pub fn to_f32(&self, mode: RoundingMode) -> f32 {
        let v = self.to_f64();
        match mode {
            RoundingMode::Nearest => v as f32,
            RoundingMode::Down => narrow_down(v),
        }
    }
}

/// Round an `f64` to `f32` toward negative infinity.
fn narrow_down(v: f64) -> f32 {
    let r = v as f32; // nearest
    if f64::from(r) > v { r.next_down() } else { r }
}

/// Higher-(or lower-)precision cross-check for the grouped-sum sweep.
#[derive(Debug, Clone, Copy)]
pub struct Oracle {
    prec_bits: u32,
    rounding: RoundingMode,
}

impl Oracle {
    pub fn new(prec_bits: u32, rounding: RoundingMode) -> Result<Self, OracleError> {
        if !(2..=53).contains(&prec_bits) {
            return Err(OracleError::Precision(prec_bits));
        }
        Ok(Self { prec_bits, rounding })
    }

    fn big(&self, v: f64) -> BigFloat {
        BigFloat::from_f64(v, self.prec_bits, self.rounding)
    }

    /// Push a value through oracle precision and back to `f32`.
    pub fn round_through(&self, v: f64) -> f32 {
        self.big(v).to_f32(self.rounding)
    }

    /// The three groupings of `a + b + c` at oracle precision, each
    /// narrowed to `f32`. All intermediate state dies with this call.
    pub fn grouped_sums(&self, a: f64, b: f64, c: f64) -> GroupedSums {
        let m = self.rounding;
        let (a, b, c) = (self.big(a), self.big(b), self.big(c));
        let natural = a.add(&b, m).add(&c, m);
        let left = a.add(&b, m).add(&c, m);
        let right = b.add(&c, m).add(&a, m);
        GroupedSums {
            natural: natural.to_f32(m),
            left: left.to_f32(m),
            right: right.to_f32(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_exact_values_exactly() {
        for v in [1.0, -1.0, 0.5, 2.0, 0.0625, -0.0625, 65504.0] {
            let bf = BigFloat::from_f64(v, 16, RoundingMode::Down);
            assert_eq!(bf.to_f64(), v, "value {v}");
        }
    }

    #[test]
    fn import_rounds_inexact_values_down() {
        let third = 1.0 / 3.0;
        let bf = BigFloat::from_f64(third, 16, RoundingMode::Down);
        let v = bf.to_f64();
        assert!(v < third, "{v} should sit below 1/3");
        // LSB of a 16-bit significand in [1/4, 1/2) weighs 2^-17.
        assert!(third - v < 2.0f64.powi(-17));

        let neg = BigFloat::from_f64(-third, 16, RoundingMode::Down);
        assert!(neg.to_f64() < -third, "negative values round away from zero");
    }

    #[test]
    fn exact_cancellation_is_negative_zero_under_down() {
        let one = BigFloat::from_f64(1.0, 16, RoundingMode::Down);
        let neg_one = BigFloat::from_f64(-1.0, 16, RoundingMode::Down);
        let z = one.add(&neg_one, RoundingMode::Down);
        assert_eq!(z.to_f32(RoundingMode::Down).to_bits(), (-0.0f32).to_bits());

        let z = one.add(&neg_one, RoundingMode::Nearest);
        assert_eq!(z.to_f32(RoundingMode::Nearest).to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn addition_of_tiny_addend_respects_direction() {
        let big = BigFloat::from_f64(1.0, 16, RoundingMode::Down);
        let tiny = BigFloat::from_f64(2.0f64.powi(-80), 16, RoundingMode::Down);
        // 1 + tiny rounds down to 1; 1 - tiny must drop below 1.
        assert_eq!(big.add(&tiny, RoundingMode::Down).to_f64(), 1.0);
        let neg_tiny = BigFloat::from_f64(-(2.0f64.powi(-80)), 16, RoundingMode::Down);
        let down = big.add(&neg_tiny, RoundingMode::Down).to_f64();
        assert!(down < 1.0);
        // Nearest snaps back to 1 in both directions.
        assert_eq!(big.add(&neg_tiny, RoundingMode::Nearest).to_f64(), 1.0);
    }

    #[test]
    fn narrow_down_lands_at_or_below_the_f64() {
        let o = Oracle::new(53, RoundingMode::Down).unwrap();
        let r = o.round_through(0.1);
        assert!(f64::from(r) <= 0.1);
        assert_eq!(r, 0.1f32.next_down(), "0.1f64 sits below the nearest f32");
        // Representable values narrow to themselves.
        assert_eq!(o.round_through(0.25), 0.25f32);
    }

    #[test]
    fn sixteen_bit_grouping_of_one_eighteenth_diverges() {
        let o = Oracle::new(16, RoundingMode::Down).unwrap();
        let s = o.grouped_sums(1.0 / 18.0, 1.0, -1.0);
        assert_eq!(s.natural.to_bits(), s.left.to_bits());
        assert!(!s.agree());
        // (a+b) loses a's low bits and rounds down, so left < right = a.
        assert!(s.left < s.right, "left {} right {}", s.left, s.right);
    }

    #[test]
    fn grouping_disagrees_in_sign_at_two_to_minus_sixteen() {
        // a = 2^-16 sits one bit below the 16-bit ulp of 1, so (a+b)
        // truncates to exactly 1 and the following -1 cancels to -0 under
        // round-down, while (b+c)+a keeps a intact. The narrowed results
        // disagree even in sign.
        let o = Oracle::new(16, RoundingMode::Down).unwrap();
        let a = 2.0f64.powi(-16);
        let s = o.grouped_sums(a, 1.0, -1.0);
        assert_eq!(s.natural.to_bits(), (-0.0f32).to_bits());
        assert_eq!(s.left.to_bits(), (-0.0f32).to_bits());
        assert_eq!(s.right, a as f32);
        assert!(s.right > 0.0);
        assert!(!s.agree());
    }

    #[test]
    fn power_of_two_grouping_agrees_at_sixteen_bits() {
        let o = Oracle::new(16, RoundingMode::Down).unwrap();
        for x in [1u32, 2, 4, 8, 16] {
            let s = o.grouped_sums(1.0 / f64::from(x), 1.0, -1.0);
            assert!(s.agree(), "x = {x}: {s:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_precision() {
        assert!(matches!(
            Oracle::new(1, RoundingMode::Down),
            Err(OracleError::Precision(1))
        ));
        assert!(Oracle::new(64, RoundingMode::Down).is_err());
        assert!(Oracle::new(24, RoundingMode::Down).is_ok());
    }
}
