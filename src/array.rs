//! `ndarray` front end.
//!
//! [`Correlation`] turns any two-dimensional array into its full symmetric
//! row-correlation matrix. Each row is treated as one sequence and each column as
//! one observation, matching the raw slice API.
//!
//! ```rust
//! use ndarray::array;
//! use simdcorr::Correlation;
//!
//! let data = array![[1.0f32, 2.0, 3.0], [3.0, 2.0, 1.0]];
//! let corr = data.correlation().unwrap();
//!
//! assert!((corr[[0, 1]] + 1.0).abs() < 1e-6);
//! assert_eq!(corr[[0, 1]], corr[[1, 0]]);
//! ```

use std::borrow::Cow;

use ndarray::{Array2, ArrayBase, Data, Ix2, ShapeBuilder};

use crate::{
    correlate::{correlate, fill_upper_triangle, par_correlate, scalar_correlate},
    error::{dimension_error, Result},
    Sample,
};

/// Row-by-row Pearson correlation of a matrix.
///
/// Every method returns the full `ny × ny` symmetric matrix (both triangles filled).
/// They differ only in the strategy used underneath, mirroring
/// [`crate::correlate()`], [`crate::par_correlate`] and [`crate::scalar_correlate`].
pub trait Correlation {
    type Output;

    /// Picks sequential or parallel execution from the matrix size.
    fn correlation(&self) -> Self::Output;

    /// Always runs both phases on the Rayon pool.
    fn par_correlation(&self) -> Self::Output;

    /// Single-accumulator reference implementation.
    fn scalar_correlation(&self) -> Self::Output;
}

type Strategy<A> = fn(usize, usize, &[A], &mut [f32]);

impl<A, S> Correlation for ArrayBase<S, Ix2>
where
    A: Sample,
    S: Data<Elem = A>,
{
    type Output = Result<Array2<f32>>;

    fn correlation(&self) -> Self::Output {
        run(self, correlate::<A>)
    }

    fn par_correlation(&self) -> Self::Output {
        run(self, par_correlate::<A>)
    }

    fn scalar_correlation(&self) -> Self::Output {
        run(self, scalar_correlate::<A>)
    }
}

fn run<A, S>(matrix: &ArrayBase<S, Ix2>, strategy: Strategy<A>) -> Result<Array2<f32>>
where
    A: Sample,
    S: Data<Elem = A>,
{
    let (ny, nx) = matrix.dim();
    if ny == 0 || nx == 0 {
        return Err(dimension_error(
            ny,
            nx,
            "matrix must have at least one row and one column",
        ));
    }

    let data = row_major(matrix);
    let mut result = vec![0.0f32; ny * ny];

    strategy(ny, nx, &data, &mut result);
    fill_upper_triangle(&mut result, ny);

    Ok(Array2::from_shape_vec((ny, ny).f(), result)?)
}

/// Borrows the elements in row-major order, copying only when the array is not
/// already laid out that way (transposed views, slices with steps, ...).
fn row_major<A, S>(matrix: &ArrayBase<S, Ix2>) -> Cow<'_, [A]>
where
    A: Sample,
    S: Data<Elem = A>,
{
    match matrix.as_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(matrix.iter().copied().collect()),
    }
}
