use approx::assert_relative_eq;
use keigen::{DoubleEngine, EngineError, FloatEngine, MatrixError, MatrixHandle};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

fn make_random(engine: &mut DoubleEngine, rows: usize, cols: usize, seed: u64) -> MatrixHandle {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f64> = (0..rows * cols).map(|_| rng.sample(StandardNormal)).collect();
    engine
        .initialize_with_data(rows, cols, &data, cols as isize, 1)
        .unwrap()
}

/// Same logical matrix, stored column-major in a fresh handle.
fn to_col_major(engine: &mut DoubleEngine, h: MatrixHandle) -> MatrixHandle {
    let (rows, cols) = engine.shape(h).unwrap();
    let mut data = Vec::with_capacity(rows * cols);
    for c in 0..cols {
        for r in 0..rows {
            data.push(engine.get(h, r, c).unwrap());
        }
    }
    engine
        .initialize_with_data(rows, cols, &data, 1, rows as isize)
        .unwrap()
}

fn naive_matmul(engine: &DoubleEngine, a: MatrixHandle, b: MatrixHandle) -> Vec<f64> {
    let (m, k) = engine.shape(a).unwrap();
    let n = engine.shape(b).unwrap().1;
    let mut out = vec![0.0; m * n];
    for i in 0..m {
        for j in 0..n {
            for p in 0..k {
                out[i * n + j] += engine.get(a, i, p).unwrap() * engine.get(b, p, j).unwrap();
            }
        }
    }
    out
}

fn assert_all_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (x, y) in actual.iter().zip(expected) {
        assert_relative_eq!(*x, *y, epsilon = 1e-10);
    }
}

#[test]
fn test_fill_times_scalar() {
    let mut engine = FloatEngine::new();
    let a = engine.initialize_fill(2, 2, 5.0).unwrap();
    let b = engine.times_scalar(a, 2.0).unwrap();
    for r in 0..2 {
        for c in 0..2 {
            assert_eq!(engine.get(b, r, c).unwrap(), 10.0);
        }
    }
}

#[test]
fn test_times_identity() {
    let mut engine = DoubleEngine::new();
    let a = engine
        .initialize_with_data(2, 2, &[1.0, 2.0, 3.0, 4.0], 2, 1)
        .unwrap();
    let i = engine.identity(2).unwrap();
    let c = engine.times(a, i).unwrap();
    assert_eq!(engine.to_vec(c).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_times_ones() {
    let mut engine = DoubleEngine::new();
    let a = engine.initialize_fill(2, 3, 1.0).unwrap();
    let b = engine.initialize_fill(3, 2, 1.0).unwrap();
    let c = engine.times(a, b).unwrap();
    assert_eq!(engine.shape(c).unwrap(), (2, 2));
    assert_eq!(engine.to_vec(c).unwrap(), vec![3.0; 4]);
}

#[test]
fn test_plus_minus_restores() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 9, 7, 1);
    let b = make_random(&mut engine, 9, 7, 2);
    let sum = engine.plus(a, b).unwrap();
    let back = engine.minus(sum, b).unwrap();
    assert_all_close(&engine.to_vec(back).unwrap(), &engine.to_vec(a).unwrap());
}

#[test]
fn test_plus_assign_minus_assign_restores() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 5, 8, 3);
    let b = make_random(&mut engine, 5, 8, 4);
    let original = engine.to_vec(a).unwrap();
    engine.plus_assign(a, b).unwrap();
    engine.minus_assign(a, b).unwrap();
    assert_all_close(&engine.to_vec(a).unwrap(), &original);
}

#[test]
fn test_plus_assign_column_major_target() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 4, 6, 5);
    let b = make_random(&mut engine, 4, 6, 6);
    let a_cm = to_col_major(&mut engine, a);
    let expected = engine.plus(a, b).unwrap();

    engine.plus_assign(a_cm, b).unwrap();
    assert_eq!(engine.strides(a_cm).unwrap(), (1, 4));
    assert_all_close(
        &engine.to_vec(a_cm).unwrap(),
        &engine.to_vec(expected).unwrap(),
    );
}

#[test]
fn test_plus_assign_self_doubles() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 3, 3, 7);
    let doubled = engine.times_scalar(a, 2.0).unwrap();
    engine.plus_assign(a, a).unwrap();
    assert_all_close(
        &engine.to_vec(a).unwrap(),
        &engine.to_vec(doubled).unwrap(),
    );
}

#[test]
fn test_shape_mismatch_leaves_operands() {
    let mut engine = DoubleEngine::new();
    let a = engine.initialize_fill(2, 3, 1.0).unwrap();
    let b = engine.initialize_fill(3, 2, 1.0).unwrap();
    let err = engine.plus_assign(a, b).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Matrix(MatrixError::DimensionMismatch { op: "plus", .. })
    ));
    assert_eq!(engine.to_vec(a).unwrap(), vec![1.0; 6]);
}

#[test]
fn test_times_matches_naive() {
    let mut engine = DoubleEngine::new();
    for (seed, &(m, k, n)) in [(1, 1, 1), (3, 4, 5), (8, 2, 7), (16, 16, 16)]
        .iter()
        .enumerate()
    {
        let a = make_random(&mut engine, m, k, seed as u64 * 2);
        let b = make_random(&mut engine, k, n, seed as u64 * 2 + 1);
        let c = engine.times(a, b).unwrap();
        assert_eq!(engine.shape(c).unwrap(), (m, n));
        assert_all_close(&engine.to_vec(c).unwrap(), &naive_matmul(&engine, a, b));

        let a_cm = to_col_major(&mut engine, a);
        let c_cm = engine.times(a_cm, b).unwrap();
        assert_all_close(&engine.to_vec(c_cm).unwrap(), &engine.to_vec(c).unwrap());
    }
}

#[test]
fn test_times_inner_mismatch() {
    let mut engine = DoubleEngine::new();
    let a = engine.initialize_fill(2, 3, 1.0).unwrap();
    let b = engine.initialize_fill(2, 3, 1.0).unwrap();
    assert!(matches!(
        engine.times(a, b),
        Err(EngineError::Matrix(MatrixError::DimensionMismatch {
            op: "times",
            lhs: (2, 3),
            rhs: (2, 3)
        }))
    ));
    assert_eq!(engine.live_count(), 2);
}

#[test]
fn test_times_into_equals_times() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 6, 4, 11);
    let b = make_random(&mut engine, 4, 3, 12);
    let expected = engine.times(a, b).unwrap();

    let dst = engine.initialize_fill(6, 3, f64::NAN).unwrap();
    engine.times_into(a, b, dst).unwrap();
    assert_eq!(engine.to_vec(dst).unwrap(), engine.to_vec(expected).unwrap());

    let dst_cm = engine
        .initialize_with_data(6, 3, &[0.0; 18], 1, 6)
        .unwrap();
    engine.times_into(a, b, dst_cm).unwrap();
    assert_all_close(
        &engine.to_vec(dst_cm).unwrap(),
        &engine.to_vec(expected).unwrap(),
    );
}

#[test]
fn test_times_into_wrong_destination_shape() {
    let mut engine = DoubleEngine::new();
    let a = engine.initialize_fill(2, 3, 1.0).unwrap();
    let b = engine.initialize_fill(3, 4, 1.0).unwrap();
    let dst = engine.initialize_fill(4, 2, 7.0).unwrap();
    assert!(matches!(
        engine.times_into(a, b, dst),
        Err(EngineError::Matrix(MatrixError::DimensionMismatch {
            op: "times_into",
            ..
        }))
    ));
    assert_eq!(engine.to_vec(dst).unwrap(), vec![7.0; 8]);
}

#[test]
fn test_times_assign_square_matches_times() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 5, 5, 21);
    let b = make_random(&mut engine, 5, 5, 22);
    let expected = engine.times(a, b).unwrap();
    engine.times_assign_square(a, b).unwrap();
    assert_all_close(
        &engine.to_vec(a).unwrap(),
        &engine.to_vec(expected).unwrap(),
    );
}

#[test]
fn test_times_assign_reshapes_behind_same_handle() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 3, 4, 31);
    let b = make_random(&mut engine, 4, 2, 32);
    let expected = engine.times(a, b).unwrap();
    let live = engine.live_count();

    engine.times_assign(a, b).unwrap();
    assert_eq!(engine.shape(a).unwrap(), (3, 2));
    assert_eq!(engine.live_count(), live);
    assert_all_close(
        &engine.to_vec(a).unwrap(),
        &engine.to_vec(expected).unwrap(),
    );
}

#[test]
fn test_times_assign_square_operand_keeps_layout() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 3, 4, 33);
    let a = to_col_major(&mut engine, a);
    let b = make_random(&mut engine, 4, 4, 34);
    let expected = engine.times(a, b).unwrap();

    engine.times_assign(a, b).unwrap();
    assert_eq!(engine.strides(a).unwrap(), (1, 3));
    assert_all_close(
        &engine.to_vec(a).unwrap(),
        &engine.to_vec(expected).unwrap(),
    );
}

#[test]
fn test_scalar_ops() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 4, 5, 41);
    let original = engine.to_vec(a).unwrap();

    let halved = engine.div_scalar(a, 2.0).unwrap();
    let scaled = engine.times_scalar(a, 0.5).unwrap();
    assert_all_close(
        &engine.to_vec(halved).unwrap(),
        &engine.to_vec(scaled).unwrap(),
    );

    engine.times_assign_scalar(a, 4.0).unwrap();
    engine.div_assign_scalar(a, 4.0).unwrap();
    assert_all_close(&engine.to_vec(a).unwrap(), &original);
}

#[test]
fn test_div_by_zero_is_not_an_error() {
    let mut engine = FloatEngine::new();
    let a = engine
        .initialize_with_data(1, 3, &[1.0, -1.0, 0.0], 3, 1)
        .unwrap();
    engine.div_assign_scalar(a, 0.0).unwrap();
    let out = engine.to_vec(a).unwrap();
    assert_eq!(out[0], f32::INFINITY);
    assert_eq!(out[1], f32::NEG_INFINITY);
    assert!(out[2].is_nan());
}

#[test]
fn test_transpose_twice() {
    let mut engine = DoubleEngine::new();
    let a = make_random(&mut engine, 7, 3, 51);
    let t = engine.transpose(a).unwrap();
    assert_eq!(engine.shape(t).unwrap(), (3, 7));
    assert_eq!(engine.get(t, 2, 5).unwrap(), engine.get(a, 5, 2).unwrap());
    let tt = engine.transpose(t).unwrap();
    assert_eq!(engine.to_vec(tt).unwrap(), engine.to_vec(a).unwrap());
}

#[test]
fn test_transpose_in_place_keeps_handle() {
    let mut engine = DoubleEngine::new();
    let a = engine
        .initialize_with_data(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 1)
        .unwrap();
    engine.transpose_in_place(a).unwrap();
    assert_eq!(engine.shape(a).unwrap(), (3, 2));
    assert_eq!(
        engine.to_vec(a).unwrap(),
        vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]
    );
    assert_eq!(engine.live_count(), 1);
}
