//! Correlation driver: normalizes every row, then reduces every row pair.
//!
//! # Strategies
//!
//! | Function               | Phase 1       | Phase 2                 | Use                      |
//! |------------------------|---------------|-------------------------|--------------------------|
//! | [`scalar_correlate`]   | sequential    | one accumulator         | reference / baseline     |
//! | [`unrolled_correlate`] | sequential    | four accumulators       | small matrices           |
//! | [`par_correlate`]      | Rayon, by row | Rayon, by output column | large matrices           |
//! | [`correlate`]          | picks one of the two above from `ny * nx` | | default entry point |
//!
//! All of them share the same contract: `data` is row-major (`data[x + y * nx]`),
//! `result` is column-major (`result[i + j * ny]`) and only cells with
//! `0 <= j <= i < ny` are written. Everything above the diagonal keeps whatever the
//! caller put there; call [`fill_upper_triangle`] afterwards for a full symmetric
//! matrix.
//!
//! # Phase ordering
//!
//! Phase 2 reads arbitrary pairs of normalized rows, so it must not start before
//! phase 1 has written all of them. In [`par_correlate`] that barrier is the join at
//! the end of the phase-1 `for_each`: it only returns once every row task has
//! finished.

use std::time::Instant;

use rayon::prelude::*;

use crate::{
    error::{buffer_error, dimension_error, Result},
    normalize::{row_mean, NormalizedMatrix},
    pairwise::PairwiseKernel,
    Sample, PARALLEL_THRESHOLD,
};

/// Linear index of `(i, j)` in a column-major matrix with leading dimension `ld`.
#[inline(always)]
pub(crate) fn at(i: usize, j: usize, ld: usize) -> usize {
    (j * ld) + i
}

/// Computes the lower triangle of the row-correlation matrix of `data`.
///
/// Small problems run [`unrolled_correlate`] on the calling thread, larger ones run
/// [`par_correlate`] on the Rayon pool. The cut-off is [`PARALLEL_THRESHOLD`] input
/// elements.
///
/// # Arguments
///
/// * `ny` - Number of rows of the input (and rows/columns of the result)
/// * `nx` - Number of columns of the input
/// * `data` - Row-major input, `ny * nx` values
/// * `result` - Column-major output, `ny * ny` values
///
/// # Panics
///
/// Panics if `data.len() != ny * nx` or `result.len() != ny * ny`. Use
/// [`try_correlate`] to get an error instead.
///
/// # Example
///
/// ```rust
/// use simdcorr::correlate;
///
/// let data = [1.0f32, 2.0, 3.0, 2.0, 4.0, 6.0];
/// let mut result = [0.0f32; 4];
/// correlate(2, 3, &data, &mut result);
///
/// assert!((result[0] - 1.0).abs() < 1e-6); // (0, 0)
/// assert!((result[1] - 1.0).abs() < 1e-6); // (1, 0)
/// assert!((result[3] - 1.0).abs() < 1e-6); // (1, 1)
/// ```
pub fn correlate<T: Sample>(ny: usize, nx: usize, data: &[T], result: &mut [f32]) {
    if ny.saturating_mul(nx) < PARALLEL_THRESHOLD {
        unrolled_correlate(ny, nx, data, result)
    } else {
        par_correlate(ny, nx, data, result)
    }
}

/// Validating front end for [`correlate`].
///
/// # Errors
///
/// * [`crate::CorrError::DimensionError`] if `ny` or `nx` is zero, or if `ny * nx`
///   or `ny * ny` overflows `usize`
/// * [`crate::CorrError::BufferError`] if `data` does not hold `ny * nx` values or
///   `result` does not hold `ny * ny` values
pub fn try_correlate<T: Sample>(
    ny: usize,
    nx: usize,
    data: &[T],
    result: &mut [f32],
) -> Result<()> {
    if ny == 0 || nx == 0 {
        return Err(dimension_error(
            ny,
            nx,
            "matrix must have at least one row and one column",
        ));
    }

    let input_len = ny
        .checked_mul(nx)
        .ok_or_else(|| dimension_error(ny, nx, "input size overflows usize"))?;
    let output_len = ny
        .checked_mul(ny)
        .ok_or_else(|| dimension_error(ny, nx, "result size overflows usize"))?;

    if data.len() != input_len {
        return Err(buffer_error(
            input_len,
            data.len(),
            "input must hold ny * nx values",
        ));
    }
    if result.len() != output_len {
        return Err(buffer_error(
            output_len,
            result.len(),
            "result must hold ny * ny values",
        ));
    }

    correlate(ny, nx, data, result);
    Ok(())
}

/// Both phases on the calling thread, with the four-accumulator kernels.
///
/// # Panics
///
/// Panics if `data.len() != ny * nx` or `result.len() != ny * ny`.
pub fn unrolled_correlate<T: Sample>(ny: usize, nx: usize, data: &[T], result: &mut [f32]) {
    if !check_dimensions(ny, nx, data.len(), result.len()) {
        return;
    }

    let started = Instant::now();
    let kernel = PairwiseKernel::detect();

    let norm = NormalizedMatrix::from_rows(ny, nx, data);
    tracing::trace!(ny, nx, "rows normalized");

    for j in 0..ny {
        let row_j = norm.row(j);
        for i in j..ny {
            result[at(i, j, ny)] = kernel.reduce(norm.row(i), row_j) as f32;
        }
    }

    tracing::debug!(
        ny,
        nx,
        strategy = "unrolled",
        kernel = ?kernel,
        elapsed_us = started.elapsed().as_micros() as u64,
        "correlation computed"
    );
}

/// Both phases on the Rayon pool.
///
/// Phase 1 hands one row to each task. Phase 2 hands one *column* of the result to
/// each task: column `j` of a column-major matrix is the contiguous slice
/// `result[j * ny..(j + 1) * ny]`, and the task fills its cells `i ∈ [j, ny)`. That
/// visits exactly the pairs `0 <= j <= i < ny`, and every task owns a disjoint
/// `&mut` slice, so no locking is involved.
///
/// Column `j` holds `ny - j` pairs. Rayon's work stealing evens out the triangle.
///
/// # Panics
///
/// Panics if `data.len() != ny * nx` or `result.len() != ny * ny`.
pub fn par_correlate<T: Sample>(ny: usize, nx: usize, data: &[T], result: &mut [f32]) {
    if !check_dimensions(ny, nx, data.len(), result.len()) {
        return;
    }

    let started = Instant::now();
    let kernel = PairwiseKernel::detect();

    // Returns only once every row is written: this is the phase barrier.
    let norm = NormalizedMatrix::par_from_rows(ny, nx, data);
    tracing::trace!(
        ny,
        nx,
        elapsed_us = started.elapsed().as_micros() as u64,
        "rows normalized"
    );

    result
        .par_chunks_mut(ny)
        .enumerate()
        .for_each(|(j, column)| {
            let row_j = norm.row(j);
            for (i, cell) in column.iter_mut().enumerate().skip(j) {
                *cell = kernel.reduce(norm.row(i), row_j) as f32;
            }
        });

    tracing::debug!(
        ny,
        nx,
        strategy = "parallel",
        kernel = ?kernel,
        elapsed_us = started.elapsed().as_micros() as u64,
        "correlation computed"
    );
}

/// Straightforward single-accumulator implementation.
///
/// Rows are only centered here; the standard deviations are kept in a separate
/// vector and every pairwise sum divides by `σ_i * σ_j` term by term. It makes no
/// attempt at speed and serves as the baseline that the other strategies are
/// measured and tested against.
///
/// # Panics
///
/// Panics if `data.len() != ny * nx` or `result.len() != ny * ny`.
pub fn scalar_correlate<T: Sample>(ny: usize, nx: usize, data: &[T], result: &mut [f32]) {
    if !check_dimensions(ny, nx, data.len(), result.len()) {
        return;
    }

    let started = Instant::now();

    let mut centered = vec![0.0f64; ny * nx];
    for y in 0..ny {
        let mean = row_mean(&data[y * nx..(y + 1) * nx]);
        for x in 0..nx {
            centered[x + y * nx] = data[x + y * nx].as_() - mean;
        }
    }

    let mut stddev = vec![0.0f64; ny];
    for y in 0..ny {
        for x in 0..nx {
            stddev[y] += centered[x + y * nx] * centered[x + y * nx];
        }
        stddev[y] = stddev[y].sqrt();
    }

    for i in 0..ny {
        for j in 0..=i {
            let sigma = stddev[i] * stddev[j];
            let mut sum = 0.0f64;
            for x in 0..nx {
                sum += centered[x + i * nx] * centered[x + j * nx] / sigma;
            }
            result[at(i, j, ny)] = sum as f32;
        }
    }

    tracing::debug!(
        ny,
        nx,
        strategy = "scalar",
        elapsed_us = started.elapsed().as_micros() as u64,
        "correlation computed"
    );
}

/// Copies every lower-triangle cell `(i, j)` of the column-major `ny × ny` matrix
/// into its mirror `(j, i)`, producing the full symmetric correlation matrix.
///
/// # Panics
///
/// Panics if `result.len() != ny * ny`.
pub fn fill_upper_triangle(result: &mut [f32], ny: usize) {
    assert_eq!(
        result.len(),
        ny * ny,
        "Result matrix has incorrect dimensions"
    );

    for j in 0..ny {
        for i in (j + 1)..ny {
            result[at(j, i, ny)] = result[at(i, j, ny)];
        }
    }
}

/// Asserts the buffer sizes and reports whether there is any work to do.
#[inline(always)]
fn check_dimensions(ny: usize, nx: usize, data_len: usize, result_len: usize) -> bool {
    assert_eq!(data_len, ny * nx, "Input matrix has incorrect dimensions");
    assert_eq!(result_len, ny * ny, "Result matrix has incorrect dimensions");

    ny != 0 && nx != 0
}
