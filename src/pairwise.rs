//! Pairwise reduction: the second phase of the correlation pipeline.
//!
//! Both inputs are rows of a [`crate::NormalizedMatrix`], i.e. mean-centered with unit
//! L2 norm, so their inner product *is* the Pearson coefficient of the unnormalized rows.
//! For valid inputs it lands in `[-1, 1]` up to rounding; if either source row was
//! constant the result is NaN.

use crate::accumulate::interleaved_sum;

/// Inner product of two normalized rows using four interleaved accumulators.
///
/// Besides hiding add latency, the four partial sums also accumulate less rounding
/// error than a single running total over long rows.
///
/// # Panics
///
/// Panics if `a` and `b` have different lengths.
///
/// # Example
///
/// ```rust
/// use simdcorr::pearson;
///
/// let h = 1.0 / 2f64.sqrt();
/// let a = [-h, 0.0, h];
/// let b = [h, 0.0, -h];
///
/// assert!((pearson(&a, &a) - 1.0).abs() < 1e-12);
/// assert!((pearson(&a, &b) + 1.0).abs() < 1e-12);
/// ```
#[inline(always)]
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "Rows must be the same length");

    interleaved_sum(a.len(), |x| a[x] * b[x])
}

/// Inner-product kernel used for the pairwise phase.
///
/// The kernel is chosen once per correlation call with [`PairwiseKernel::detect`] and
/// then applied to every pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairwiseKernel {
    /// Portable four-accumulator reduction ([`pearson`]).
    Unrolled,
    /// Four 256-bit FMA accumulators over a 16-wide stride. Only
    /// [`PairwiseKernel::detect`] builds it, and only on CPUs that support AVX2 and FMA.
    #[non_exhaustive]
    Avx2Fma,
}

impl PairwiseKernel {
    /// Returns the fastest kernel the running CPU supports.
    pub fn detect() -> Self {
        #[cfg(all(avx2, target_arch = "x86_64"))]
        {
            if std::is_x86_feature_detected!("avx2") && std::is_x86_feature_detected!("fma") {
                return PairwiseKernel::Avx2Fma;
            }
        }

        PairwiseKernel::Unrolled
    }

    /// Inner product of `a` and `b` with this kernel.
    #[inline(always)]
    pub fn reduce(self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            PairwiseKernel::Unrolled => pearson(a, b),
            PairwiseKernel::Avx2Fma => reduce_avx2(a, b),
        }
    }
}

#[cfg(all(avx2, target_arch = "x86_64"))]
#[inline(always)]
fn reduce_avx2(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "Rows must be the same length");

    // SAFETY: `Avx2Fma` is only built by `detect`, after both target features were
    // confirmed at runtime.
    unsafe { crate::simd::avx2::dot::dot_f64x4(a, b) }
}

#[cfg(not(all(avx2, target_arch = "x86_64")))]
#[inline(always)]
fn reduce_avx2(a: &[f64], b: &[f64]) -> f64 {
    pearson(a, b)
}
