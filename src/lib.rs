//! Pearson correlation matrices over the rows of a dense matrix.
//!
//! `simdcorr` computes the lower triangle (diagonal included) of the row-by-row
//! Pearson correlation matrix of an `ny × nx` input. The work is split in two
//! phases:
//!
//! 1. **Normalization**: every row is centered on its mean and scaled to unit L2
//!    norm, in `f64`.
//! 2. **Pairwise reduction**: the correlation of rows `i` and `j` is then simply the
//!    inner product of their normalized forms.
//!
//! Both phases reduce with four independent accumulators over an 8-wide unrolled
//! stride so that consecutive floating-point additions do not wait on each other.
//! On x86_64 hosts with AVX2 and FMA the pairwise phase switches to a 256-bit kernel
//! built on the same idea.
//!
//! # Layout
//!
//! The input is **row-major** (`data[x + y * nx]`) while the output is
//! **column-major** (`result[i + j * ny]`). Only cells with `j <= i` are written;
//! see [`fill_upper_triangle`] to obtain the full symmetric matrix.
//!
//! # Example
//!
//! ```rust
//! use simdcorr::correlate;
//!
//! let data = [1.0f32, 2.0, 3.0, 3.0, 2.0, 1.0];
//! let mut result = [0.0f32; 4];
//!
//! correlate(2, 3, &data, &mut result);
//!
//! assert!((result[0] - 1.0).abs() < 1e-6);
//! assert!((result[1] + 1.0).abs() < 1e-6);
//! ```

pub mod accumulate;
pub mod array;
pub mod correlate;
pub mod error;
pub mod normalize;
pub mod pairwise;
pub mod simd;

pub use array::Correlation;
pub use correlate::{
    correlate, fill_upper_triangle, par_correlate, scalar_correlate, try_correlate,
    unrolled_correlate,
};
pub use error::{CorrError, Result};
pub use normalize::{normalize_row, row_mean, row_norm, NormalizedMatrix};
pub use pairwise::{pearson, PairwiseKernel};

use num::traits::AsPrimitive;

/// Number of independent partial sums kept by every reduction.
pub const ACCUMULATORS: usize = 4;

/// Elements consumed per iteration of an unrolled reduction loop.
pub const UNROLL: usize = ACCUMULATORS * 2;

/// Problems with fewer than this many input elements (`ny * nx`) are computed on
/// the calling thread; larger ones are spread over the Rayon pool.
pub const PARALLEL_THRESHOLD: usize = 32_768;

/// Element types accepted as correlation input.
///
/// Anything that widens to `f64` with an `as` cast qualifies: `f32`, `f64` and the
/// primitive integers.
pub trait Sample: AsPrimitive<f64> + Send + Sync {}

impl<T> Sample for T where T: AsPrimitive<f64> + Send + Sync {}
