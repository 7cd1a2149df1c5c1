//! Experiments on the non-associativity of IEEE-754 single-precision addition.
//!
//! Two experiments share the core building blocks:
//! - a grouped-sum sweep comparing `(a+b)+c` against `a+(b+c)` for `a = 1/x`,
//!   optionally cross-checked by a reduced-precision software float oracle,
//! - a shuffle-sum histogram tallying the exact `f32` outcomes of summing a
//!   fixed operand multiset in one million random orders.

pub mod cli;
pub mod config;
pub mod core;
pub mod report;
