//! core/bin_render.rs — exact base-2 rendering of `f32` values.
//!
//! Renders a finite value as "integerBits.fractionalBits", e.g.
//! 2.25 → "10.01". The expansion is exact and always terminates: every
//! finite `f32` is a binary fraction whose last set bit is no lower than
//! 2⁻¹⁴⁹ (the smallest subnormal), so the fractional loop runs at most
//! 149 times. Output grows in a `String`; there is no fixed bit budget.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RenderError {
    #[error("cannot render non-finite value {0}")]
    NonFinite(f32),
}

/// Exact binary expansion of `v` as "int.frac", with a leading '-' for
/// negative values. Pure view; never fed back into arithmetic.
pub fn render(v: f32) -> Result<String, RenderError> {
    if !v.is_finite() {
        return Err(RenderError::NonFinite(v));
    }

    let mut out = String::new();
    if v < 0.0 {
        out.push('-');
    }

    // f64 holds every f32 exactly, so trunc/subtract below are exact.
    let mag = f64::from(v).abs();
    let int_part = mag.trunc();
    let mut frac = mag - int_part;

    if int_part == 0.0 {
        out.push('0');
    } else {
        // Any finite f32 integer part is < 2^128.
        let mut n = int_part as u128;
        let mut bits = Vec::new();
        while n > 0 {
            bits.push(if n & 1 == 1 { '1' } else { '0' });
            n >>= 1;
        }
        out.extend(bits.iter().rev());
    }

    out.push('.');

    if frac == 0.0 {
        out.push('0');
    } else {
        while frac > 0.0 {
            frac *= 2.0;
            if frac >= 1.0 {
                out.push('1');
                frac -= 1.0;
            } else {
                out.push('0');
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    /// Inverse of `render`, exact for values that originated as f32.
    fn parse(s: &str) -> f32 {
        let (neg, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_bits, frac_bits) = s.split_once('.').expect("radix point");
        let mut acc = 0.0f64;
        for b in int_bits.chars() {
            acc = acc * 2.0 + if b == '1' { 1.0 } else { 0.0 };
        }
        let mut f = 0.0f64;
        for b in frac_bits.chars().rev() {
            f = (f + if b == '1' { 1.0 } else { 0.0 }) / 2.0;
        }
        let v = (acc + f) as f32;
        if neg { -v } else { v }
    }

    #[test]
    fn renders_simple_fractions() {
        assert_eq!(render(0.5).unwrap(), "0.1");
        assert_eq!(render(0.25).unwrap(), "0.01");
        assert_eq!(render(2.0).unwrap(), "10.0");
        assert_eq!(render(2.25).unwrap(), "10.01");
        assert_eq!(render(0.0).unwrap(), "0.0");
    }

    #[test]
    fn renders_sign() {
        assert_eq!(render(-0.5).unwrap(), "-0.1");
        assert_eq!(render(-3.0).unwrap(), "-11.0");
    }

    #[test]
    fn rejects_non_finite() {
        assert_eq!(
            render(f32::INFINITY),
            Err(RenderError::NonFinite(f32::INFINITY))
        );
        assert_eq!(
            render(f32::NEG_INFINITY),
            Err(RenderError::NonFinite(f32::NEG_INFINITY))
        );
        assert!(render(f32::NAN).is_err());
    }

    #[test]
    fn smallest_subnormal_terminates_with_149_fraction_bits() {
        let tiny = f32::from_bits(1); // 2^-149
        let s = render(tiny).unwrap();
        let frac = s.split_once('.').unwrap().1;
        assert_eq!(frac.len(), 149);
        assert!(frac.ends_with('1'));
        assert_eq!(parse(&s), tiny);
    }

    #[test]
    fn round_trips_extremes() {
        for v in [
            f32::MAX,
            f32::MIN_POSITIVE,
            1.0 / 3.0,
            1e-40, // subnormal
            10000.0,
            -1.0 / 18.0,
        ] {
            let s = render(v).unwrap();
            assert_eq!(parse(&s).to_bits(), v.to_bits(), "value {v} via {s}");
        }
    }

    #[test]
    fn round_trips_random_bit_patterns() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut checked = 0;
        while checked < 1000 {
            let v = f32::from_bits(rng.random::<u32>());
            if !v.is_finite() {
                continue;
            }
            let s = render(v).unwrap();
            assert_eq!(parse(&s).to_bits(), v.to_bits(), "value {v} via {s}");
            checked += 1;
        }
    }
}
