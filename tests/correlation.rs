use ndarray::Array2;
use ndarray_stats::CorrelationExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdcorr::{
    correlate, fill_upper_triangle, par_correlate, scalar_correlate, try_correlate,
    unrolled_correlate, CorrError, Correlation,
};

type Strategy = fn(usize, usize, &[f32], &mut [f32]);

const STRATEGIES: [(&str, Strategy); 4] = [
    ("scalar", scalar_correlate::<f32>),
    ("unrolled", unrolled_correlate::<f32>),
    ("parallel", par_correlate::<f32>),
    ("dispatch", correlate::<f32>),
];

fn random_matrix(ny: usize, nx: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..ny * nx).map(|_| rng.random_range(-1.0f32..1.0)).collect()
}

fn run(strategy: Strategy, ny: usize, nx: usize, data: &[f32]) -> Vec<f32> {
    let mut result = vec![f32::NAN; ny * ny];
    strategy(ny, nx, data, &mut result);
    result
}

#[test]
fn test_end_to_end_positive_multiple() {
    let data = [1.0f32, 2.0, 3.0, 2.0, 4.0, 6.0];
    for (name, strategy) in STRATEGIES {
        let result = run(strategy, 2, 3, &data);
        assert!((result[0] - 1.0).abs() < 1e-6, "{}: {:?}", name, result);
        assert!((result[1] - 1.0).abs() < 1e-6, "{}: {:?}", name, result);
        assert!((result[3] - 1.0).abs() < 1e-6, "{}: {:?}", name, result);
    }
}

#[test]
fn test_end_to_end_negative_multiple() {
    let data = [1.0f32, 2.0, 3.0, 3.0, 2.0, 1.0];
    for (name, strategy) in STRATEGIES {
        let result = run(strategy, 2, 3, &data);
        assert!((result[1] + 1.0).abs() < 1e-6, "{}: {:?}", name, result);
    }
}

#[test]
fn test_end_to_end_constant_row() {
    let data = [
        1.0f32, 3.0, 2.0, 5.0, //
        5.0, 5.0, 5.0, 5.0, //
        4.0, 1.0, 1.0, 2.0,
    ];
    let ny = 3;

    for (name, strategy) in STRATEGIES {
        let result = run(strategy, ny, 4, &data);
        for i in 0..ny {
            for j in 0..=i {
                let v = result[i + j * ny];
                if i == 1 || j == 1 {
                    assert!(v.is_nan(), "{}: ({}, {}) = {}", name, i, j, v);
                } else {
                    assert!(v.is_finite() && v.abs() <= 1.0 + 1e-6, "{}: {}", name, v);
                }
            }
        }
    }
}

#[test]
fn test_constant_rows_of_any_value_are_nan() {
    let mut rng = StdRng::seed_from_u64(11);

    for (value, nx) in [(2.0f32, 7), (0.7, 100), (1.1, 100), (3.3, 100), (7.77, 13)] {
        let ny = 3;
        let mut data = random_matrix(1, nx, rng.random_range(0..1000));
        data.extend(std::iter::repeat(value).take(nx));
        data.extend(random_matrix(1, nx, rng.random_range(0..1000)));

        for (name, strategy) in STRATEGIES {
            let result = run(strategy, ny, nx, &data);
            for (i, j) in [(1, 0), (1, 1), (2, 1)] {
                let v = result[i + j * ny];
                assert!(v.is_nan(), "{}: {} x {} at ({}, {}) = {}", name, value, nx, i, j, v);
            }
            assert!((result[0] - 1.0).abs() < 1e-6, "{}", name);
            assert!((result[2 + 2 * ny] - 1.0).abs() < 1e-6, "{}", name);
        }
    }
}

#[test]
fn test_random_matrix_properties() {
    for (ny, nx, seed) in [(1, 9, 1), (7, 3, 2), (33, 64, 3), (100, 41, 4)] {
        let data = random_matrix(ny, nx, seed);

        for (name, strategy) in STRATEGIES {
            let result = run(strategy, ny, nx, &data);

            for i in 0..ny {
                let diag = result[i + i * ny];
                assert!((diag - 1.0).abs() < 1e-5, "{}: diag {} = {}", name, i, diag);

                for j in 0..i {
                    let v = result[i + j * ny];
                    assert!(
                        (-1.0 - 1e-5..=1.0 + 1e-5).contains(&v),
                        "{}: ({}, {}) = {}",
                        name,
                        i,
                        j,
                        v
                    );
                }
            }
        }
    }
}

#[test]
fn test_symmetry_by_recomputation() {
    let (ny, nx) = (12, 50);
    let data = random_matrix(ny, nx, 7);
    let forward = run(correlate::<f32>, ny, nx, &data);

    // Reverse the row order: the pair (i, j) becomes (ny-1-i, ny-1-j), which lands
    // the forward upper-triangle pair in the lower triangle.
    let reversed: Vec<f32> = data.chunks(nx).rev().flatten().copied().collect();
    let backward = run(correlate::<f32>, ny, nx, &reversed);

    for i in 0..ny {
        for j in 0..=i {
            let (ri, rj) = (ny - 1 - j, ny - 1 - i);
            let a = forward[i + j * ny];
            let b = backward[ri + rj * ny];
            assert!((a - b).abs() < 1e-6, "({}, {}): {} vs {}", i, j, a, b);
        }
    }
}

#[test]
fn test_scale_invariance() {
    let nx = 37;
    let base = random_matrix(1, nx, 11);
    let mut data = base.clone();
    data.extend(base.iter().map(|v| v * 4.0 + 1.5));
    data.extend(base.iter().map(|v| v * -2.5));

    for (name, strategy) in STRATEGIES {
        let result = run(strategy, 3, nx, &data);
        assert!((result[1] - 1.0).abs() < 1e-5, "{}: {}", name, result[1]);
        assert!((result[2] + 1.0).abs() < 1e-5, "{}: {}", name, result[2]);
        assert!((result[2 + 3] + 1.0).abs() < 1e-5, "{}: {}", name, result[5]);
    }
}

#[test]
fn test_matches_ndarray_stats() {
    for (ny, nx, seed) in [(5, 20, 21), (24, 7, 22), (60, 130, 23)] {
        let data = random_matrix(ny, nx, seed);
        let matrix = Array2::from_shape_vec((ny, nx), data.clone()).unwrap();

        let expected = matrix.mapv(f64::from).pearson_correlation().unwrap();
        let result = run(correlate::<f32>, ny, nx, &data);

        for i in 0..ny {
            for j in 0..=i {
                let got = result[i + j * ny] as f64;
                let want = expected[[i, j]];
                assert!(
                    (got - want).abs() < 1e-4,
                    "{}x{} ({}, {}): {} vs {}",
                    ny,
                    nx,
                    i,
                    j,
                    got,
                    want
                );
            }
        }
    }
}

#[test]
fn test_large_parallel_matches_scalar() {
    let (ny, nx) = (150, 300);
    let data = random_matrix(ny, nx, 99);

    let reference = run(scalar_correlate::<f32>, ny, nx, &data);
    let parallel = run(par_correlate::<f32>, ny, nx, &data);

    for i in 0..ny {
        for j in 0..=i {
            let idx = i + j * ny;
            assert!(
                (reference[idx] - parallel[idx]).abs() < 1e-5,
                "({}, {}): {} vs {}",
                i,
                j,
                reference[idx],
                parallel[idx]
            );
        }
    }
}

#[test]
fn test_array_front_end_matches_raw() {
    let (ny, nx) = (9, 25);
    let data = random_matrix(ny, nx, 5);
    let matrix = Array2::from_shape_vec((ny, nx), data.clone()).unwrap();

    let mut raw = run(correlate::<f32>, ny, nx, &data);
    fill_upper_triangle(&mut raw, ny);
    let full = matrix.correlation().unwrap();

    for i in 0..ny {
        for j in 0..ny {
            assert_eq!(full[[i, j]], raw[i + j * ny]);
        }
    }
}

#[test]
fn test_try_correlate_errors() {
    let data = random_matrix(3, 4, 0);
    let mut result = vec![0.0f32; 9];

    assert!(try_correlate(3, 4, &data, &mut result).is_ok());

    match try_correlate(3, 5, &data, &mut result) {
        Err(CorrError::BufferError {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 15);
            assert_eq!(actual, 12);
        }
        other => panic!("unexpected: {:?}", other),
    }

    let err = try_correlate::<f32>(0, 0, &[], &mut []).unwrap_err();
    assert!(err.to_string().contains("Invalid matrix dimensions"));
}
