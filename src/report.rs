//! Stdout tables for both experiments. Layout mirrors the reference output;
//! only the numeric content is load-bearing.

use crate::core::grouping::SweepRow;
use crate::core::shuffle::Histogram;

pub fn print_sweep(rows: &[SweepRow]) {
    println!(
        "|  {:<12} {:<29}| {:<29}   {:<12}  {:<12}| equal |",
        "a",
        "bin(a)",
        "bin(a+b+c)",
        "(a+b)+c",
        "a+(b+c)"
    );
    for row in rows {
        println!(
            "| {:12.9}  {:<29}| {:<29}  {:12.9}  {:12.9} | {:<5} |",
            row.a,
            row.a_bits,
            row.natural_bits,
            row.sums.left,
            row.sums.right,
            row.agree as u8
        );
    }
}

/// One line per distinct outcome, ascending by key. 26 fractional digits
/// are enough to tell adjacent `f32` values apart at these magnitudes.
pub fn print_histogram(hist: &Histogram) {
    for (value, count) in hist.entries() {
        println!("{:>32.26}: {:>12.9} %", value, hist.percentage(count));
    }
}
