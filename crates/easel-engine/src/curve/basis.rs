//! Cubic basis matrices and the forward-difference composition.
//!
//! Matrices are row-major and evaluated in `f64`; running deltas accumulate
//! over hundreds of additions and single precision drifts visibly.

pub(crate) type Mat4 = [[f64; 4]; 4];

/// Cubic Bezier basis.
pub(crate) const BEZIER: Mat4 = [
    [-1.0, 3.0, -3.0, 1.0],
    [3.0, -6.0, 3.0, 0.0],
    [-3.0, 3.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
];

/// Catmull-Rom basis with adjustable tightness; `0` is the standard spline,
/// `1` collapses to straight segments.
pub(crate) fn catmull_rom(tightness: f32) -> Mat4 {
    let s = f64::from(tightness);
    [
        [(s - 1.0) / 2.0, (s + 3.0) / 2.0, (-3.0 - s) / 2.0, (1.0 - s) / 2.0],
        [1.0 - s, (-5.0 - s) / 2.0, s + 2.0, (s - 1.0) / 2.0],
        [(s - 1.0) / 2.0, 0.0, (1.0 - s) / 2.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
    ]
}

/// Step matrix for `steps` uniform increments of `t`.
///
/// Multiplied with a basis, row 0 yields the start point and rows 1..=3 the
/// first, second and third forward differences.
pub(crate) fn forward_differences(steps: u32) -> Mat4 {
    let f = 1.0 / f64::from(steps);
    let ff = f * f;
    let fff = ff * f;
    [
        [0.0, 0.0, 0.0, 1.0],
        [fff, ff, f, 0.0],
        [6.0 * fff, 2.0 * ff, 0.0, 0.0],
        [6.0 * fff, 0.0, 0.0, 0.0],
    ]
}

pub(crate) fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0; 4]; 4];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..4).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// `row · [p0, p1, p2, p3]` for one coordinate.
#[inline]
pub(crate) fn dot(row: &[f64; 4], p: [f32; 4]) -> f64 {
    row.iter().zip(p).map(|(m, v)| m * f64::from(v)).sum()
}

/// Evaluates a cubic in basis `m` at `t`.
pub(crate) fn eval(m: &Mat4, p: [f32; 4], t: f32) -> f32 {
    let t = f64::from(t);
    let powers = [t * t * t, t * t, t, 1.0];
    weigh(m, p, powers)
}

/// First derivative of a cubic in basis `m` at `t`.
pub(crate) fn eval_tangent(m: &Mat4, p: [f32; 4], t: f32) -> f32 {
    let t = f64::from(t);
    let powers = [3.0 * t * t, 2.0 * t, 1.0, 0.0];
    weigh(m, p, powers)
}

fn weigh(m: &Mat4, p: [f32; 4], powers: [f64; 4]) -> f32 {
    let coeffs: [f64; 4] = std::array::from_fn(|r| dot(&m[r], p));
    coeffs.iter().zip(powers).map(|(c, w)| c * w).sum::<f64>() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bezier_rows_give_endpoints() {
        let p = [2.0, 5.0, 7.0, 11.0];
        assert_eq!(eval(&BEZIER, p, 0.0), 2.0);
        assert_eq!(eval(&BEZIER, p, 1.0), 11.0);
    }

    #[test]
    fn catmull_rom_passes_through_inner_points() {
        let p = [0.0, 10.0, 20.0, 40.0];
        let m = catmull_rom(0.0);
        assert!((eval(&m, p, 0.0) - 10.0).abs() < 1e-6);
        assert!((eval(&m, p, 1.0) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn full_tightness_hits_midpoint() {
        let p = [0.0, 10.0, 20.0, 90.0];
        let m = catmull_rom(1.0);
        assert!((eval(&m, p, 0.5) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn identity_product() {
        let id: Mat4 = std::array::from_fn(|i| std::array::from_fn(|j| if i == j { 1.0 } else { 0.0 }));
        assert_eq!(mul(&id, &BEZIER), BEZIER);
    }
}
