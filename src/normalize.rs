//! Row normalization: the first phase of the correlation pipeline.
//!
//! Each input row `r` becomes `(r - mean(r)) / ||r - mean(r)||₂` in `f64`. Once every
//! row has zero mean and unit norm, the Pearson coefficient of two rows reduces to
//! their plain inner product, which is what [`crate::pairwise`] computes.
//!
//! A constant row has a centered norm of exactly zero, so normalizing it divides
//! `0 / 0` and yields NaN throughout. That NaN is intentionally left in place:
//! correlation is undefined for a constant sequence and the caller sees it as such.

use rayon::prelude::*;

use crate::{accumulate::interleaved_sum, Sample};

/// Arithmetic mean of `row`, accumulated in `f64`.
///
/// Every term is divided by the row length before it is summed so that partial
/// sums stay in the magnitude range of the data itself. A constant row returns its
/// value exactly, so that centering it gives exact zeros.
#[inline(always)]
pub fn row_mean<T: Sample>(row: &[T]) -> f64 {
    if let Some(first) = row.first() {
        let first: f64 = first.as_();
        // `v / n` rounds, and the rounded terms need not sum back to `v`
        if row.iter().all(|v| v.as_() == first) {
            return first;
        }
    }

    let n = row.len() as f64;
    interleaved_sum(row.len(), |x| row[x].as_() / n)
}

/// Euclidean (L2) norm of `row`.
#[inline(always)]
pub fn row_norm(row: &[f64]) -> f64 {
    interleaved_sum(row.len(), |x| row[x] * row[x]).sqrt()
}

/// Writes the mean-centered, unit-norm version of `row` into `out`.
///
/// # Panics
///
/// Panics if `row` and `out` have different lengths.
#[inline(always)]
pub fn normalize_row<T: Sample>(row: &[T], out: &mut [f64]) {
    assert_eq!(
        row.len(),
        out.len(),
        "Input row and output row must be the same length"
    );

    let mean = row_mean(row);
    for (o, &v) in out.iter_mut().zip(row.iter()) {
        *o = v.as_() - mean;
    }

    let norm = row_norm(out);
    for o in out.iter_mut() {
        *o /= norm;
    }
}

/// Row-major `ny × nx` matrix of normalized rows.
///
/// Built once per correlation call and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatrix {
    data: Vec<f64>,
    ny: usize,
    nx: usize,
}

impl NormalizedMatrix {
    /// Normalizes every row of the row-major `data` on the calling thread.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != ny * nx`.
    pub fn from_rows<T: Sample>(ny: usize, nx: usize, data: &[T]) -> Self {
        let mut matrix = Self::zeroed(ny, nx, data.len());
        if nx == 0 {
            return matrix;
        }

        matrix
            .data
            .chunks_exact_mut(nx)
            .zip(data.chunks_exact(nx))
            .for_each(|(out, row)| normalize_row(row, out));

        matrix
    }

    /// Normalizes every row of the row-major `data` on the Rayon pool.
    ///
    /// Each task reads one input row and writes the matching output row, so the rows
    /// are processed with no synchronization at all. The function returns only after
    /// every row has been written.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != ny * nx`.
    pub fn par_from_rows<T: Sample>(ny: usize, nx: usize, data: &[T]) -> Self {
        let mut matrix = Self::zeroed(ny, nx, data.len());
        if nx == 0 {
            return matrix;
        }

        matrix
            .data
            .par_chunks_exact_mut(nx)
            .zip(data.par_chunks_exact(nx))
            .for_each(|(out, row)| normalize_row(row, out));

        matrix
    }

    fn zeroed(ny: usize, nx: usize, provided: usize) -> Self {
        assert_eq!(
            provided,
            ny * nx,
            "Input matrix has incorrect dimensions: expected {} x {} values",
            ny,
            nx
        );

        NormalizedMatrix {
            data: vec![0.0; ny * nx],
            ny,
            nx,
        }
    }

    /// Number of rows (`ny`).
    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.ny
    }

    /// Number of columns (`nx`).
    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.nx
    }

    /// Normalized row `y`.
    #[inline(always)]
    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.nx..(y + 1) * self.nx]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
