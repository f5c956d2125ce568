//! Multi-accumulator summation shared by every reduction in the crate.
//!
//! A naive `sum += term(x)` loop forms a single dependency chain: each addition has to
//! wait for the previous one to retire, so throughput is bounded by FP add latency
//! (~4 cycles) rather than by the number of adders. Splitting the sum over
//! [`ACCUMULATORS`] independent partials lets the core keep several additions in
//! flight at once. As a side effect the rounding error grows with `n / 4` instead of
//! `n`.
//!
//! Elements are consumed [`UNROLL`] at a time:
//!
//! ```text
//! x:     0  1  2  3  4  5  6  7 | 8  9 ...
//! acc:   0  1  2  3  0  1  2  3 | 0  1 ...
//! ```
//!
//! Whatever does not fill a full group of eight lands in accumulator 0.

use crate::{ACCUMULATORS, UNROLL};

/// Sums `term(x)` for `x` in `0..len` using four interleaved accumulators.
///
/// `term` is called exactly once per index, in increasing order within each
/// accumulator. Callers index their slices inside the closure; with `len` equal to
/// the slice length the bounds checks fold away after inlining.
#[inline(always)]
pub fn interleaved_sum<F>(len: usize, term: F) -> f64
where
    F: Fn(usize) -> f64,
{
    let mut acc = [0.0f64; ACCUMULATORS];

    let mut x = 0;
    while x + UNROLL <= len {
        acc[0] += term(x);
        acc[1] += term(x + 1);
        acc[2] += term(x + 2);
        acc[3] += term(x + 3);
        acc[0] += term(x + 4);
        acc[1] += term(x + 5);
        acc[2] += term(x + 6);
        acc[3] += term(x + 7);
        x += UNROLL;
    }

    while x < len {
        acc[0] += term(x);
        x += 1;
    }

    (acc[0] + acc[1]) + (acc[2] + acc[3])
}
