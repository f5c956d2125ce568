//! Vectorized inner product of two `f64` rows.

use std::arch::x86_64::*;

/// Number of `f64` lanes in a 256-bit register.
pub const LANE_COUNT: usize = 4;

/// Elements consumed per iteration: one register for each of the four accumulators.
const STRIDE: usize = LANE_COUNT * 4;

/// Computes `Σ a[x] * b[x]` with four independent `__m256d` FMA accumulators.
///
/// The main loop consumes 16 elements per iteration, one vector per accumulator, so
/// no FMA depends on the one issued directly before it. The accumulators are summed
/// pairwise, reduced horizontally, and any tail (`len % 16`) is added serially.
///
/// Only `min(a.len(), b.len())` elements are read.
///
/// # Safety
///
/// The caller must ensure the running CPU supports `avx2` and `fma`.
#[target_feature(enable = "avx2,fma")]
pub unsafe fn dot_f64x4(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    let pa = a.as_ptr();
    let pb = b.as_ptr();

    let mut acc0 = _mm256_setzero_pd();
    let mut acc1 = _mm256_setzero_pd();
    let mut acc2 = _mm256_setzero_pd();
    let mut acc3 = _mm256_setzero_pd();

    let mut x = 0;
    while x + STRIDE <= n {
        // SAFETY: x + STRIDE <= n, so all four 4-lane loads stay inside both slices.
        acc0 = _mm256_fmadd_pd(_mm256_loadu_pd(pa.add(x)), _mm256_loadu_pd(pb.add(x)), acc0);
        acc1 = _mm256_fmadd_pd(
            _mm256_loadu_pd(pa.add(x + 4)),
            _mm256_loadu_pd(pb.add(x + 4)),
            acc1,
        );
        acc2 = _mm256_fmadd_pd(
            _mm256_loadu_pd(pa.add(x + 8)),
            _mm256_loadu_pd(pb.add(x + 8)),
            acc2,
        );
        acc3 = _mm256_fmadd_pd(
            _mm256_loadu_pd(pa.add(x + 12)),
            _mm256_loadu_pd(pb.add(x + 12)),
            acc3,
        );
        x += STRIDE;
    }

    let sum = _mm256_add_pd(_mm256_add_pd(acc0, acc1), _mm256_add_pd(acc2, acc3));

    let mut lanes = [0.0f64; LANE_COUNT];
    _mm256_storeu_pd(lanes.as_mut_ptr(), sum);
    let mut total = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);

    while x < n {
        total += a[x] * b[x];
        x += 1;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> bool {
        is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
    }

    #[test]
    fn test_dot_matches_scalar() {
        if !supported() {
            return;
        }

        for n in 0..=50 {
            let a: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
            let b: Vec<f64> = (0..n).map(|i| (i as f64 * 0.5).cos()).collect();
            let expected: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();

            let got = unsafe { dot_f64x4(&a, &b) };
            assert!(
                (got - expected).abs() < 1e-12,
                "n={}: avx2={}, scalar={}",
                n,
                got,
                expected
            );
        }
    }

    #[test]
    fn test_dot_uses_shorter_length() {
        if !supported() {
            return;
        }

        let a = vec![1.0; 20];
        let b = vec![2.0; 17];
        assert_eq!(unsafe { dot_f64x4(&a, &b) }, 34.0);
    }

    #[test]
    fn test_dot_propagates_nan() {
        if !supported() {
            return;
        }

        let mut a = vec![1.0; 32];
        a[5] = f64::NAN;
        let b = vec![1.0; 32];
        assert!(unsafe { dot_f64x4(&a, &b) }.is_nan());
    }
}
