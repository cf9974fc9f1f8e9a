use crate::coords::Vec3;
use crate::error::{DrawError, DrawResult};

use super::basis::{self, Mat4};

/// Memoized forward-difference curve stepper.
///
/// Draw matrices are rebuilt only when the step count (or, for Catmull-Rom,
/// the tightness) differs from the previous request.
#[derive(Debug, Default, Clone)]
pub struct CurveTessellator {
    bezier: Option<(u32, Mat4)>,
    catmull_rom: Option<(u32, u32, Mat4)>,
    rebuilds: u64,
}

impl CurveTessellator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of draw-matrix rebuilds so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Steps a cubic Bezier through `steps` points over `t ∈ (0, 1]`.
    pub fn tessellate_bezier(&mut self, points: [Vec3; 4], steps: u32) -> DrawResult<ForwardSteps> {
        check_steps(steps)?;
        let draw = match self.bezier {
            Some((s, m)) if s == steps => m,
            _ => {
                let m = basis::mul(&basis::forward_differences(steps), &basis::BEZIER);
                self.bezier = Some((steps, m));
                self.rebuilds += 1;
                log::debug!("bezier draw matrix rebuilt for {steps} steps");
                m
            }
        };
        Ok(ForwardSteps::new(&draw, points, steps))
    }

    /// Steps the Catmull-Rom segment between `points[1]` and `points[2]`.
    pub fn tessellate_catmull_rom(
        &mut self,
        points: [Vec3; 4],
        steps: u32,
        tightness: f32,
    ) -> DrawResult<ForwardSteps> {
        check_steps(steps)?;
        if !tightness.is_finite() {
            return Err(DrawError::invalid_argument(format!("curve tightness {tightness} is not finite")));
        }
        let key = tightness.to_bits();
        let draw = match self.catmull_rom {
            Some((s, t, m)) if s == steps && t == key => m,
            _ => {
                let m = basis::mul(&basis::forward_differences(steps), &basis::catmull_rom(tightness));
                self.catmull_rom = Some((steps, key, m));
                self.rebuilds += 1;
                log::debug!("curve draw matrix rebuilt for {steps} steps, tightness {tightness}");
                m
            }
        };
        Ok(ForwardSteps::new(&draw, points, steps))
    }
}

fn check_steps(steps: u32) -> DrawResult<()> {
    if steps == 0 {
        Err(DrawError::invalid_argument("curve detail must be at least 1"))
    } else {
        Ok(())
    }
}

/// Points produced by forward differencing: three running deltas, additions only.
///
/// Clone before iterating to replay the sequence.
#[derive(Debug, Clone)]
pub struct ForwardSteps {
    start: [f64; 3],
    pos: [f64; 3],
    d1: [f64; 3],
    d2: [f64; 3],
    d3: [f64; 3],
    remaining: u32,
}

impl ForwardSteps {
    fn new(draw: &Mat4, points: [Vec3; 4], steps: u32) -> Self {
        let axes = [
            points.map(|p| p.x),
            points.map(|p| p.y),
            points.map(|p| p.z),
        ];
        let row = |r: usize| axes.map(|a| basis::dot(&draw[r], a));
        let start = row(0);
        Self { start, pos: start, d1: row(1), d2: row(2), d3: row(3), remaining: steps }
    }

    /// Curve position at `t = 0`, which the iterator does not yield.
    pub fn start(&self) -> Vec3 {
        to_vec3(self.start)
    }
}

impl Iterator for ForwardSteps {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        for i in 0..3 {
            self.pos[i] += self.d1[i];
            self.d1[i] += self.d2[i];
            self.d2[i] += self.d3[i];
        }
        Some(to_vec3(self.pos))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ForwardSteps {}

#[inline]
fn to_vec3(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32)
}

// ── direct evaluation ─────────────────────────────────────────────────────

/// Bezier coordinate at `t` for control values `a..d`.
pub fn bezier_point(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let t1 = 1.0 - t;
    a * t1 * t1 * t1 + 3.0 * b * t * t1 * t1 + 3.0 * c * t * t * t1 + d * t * t * t
}

/// Derivative of [`bezier_point`] at `t`.
pub fn bezier_tangent(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    3.0 * t * t * (-a + 3.0 * b - 3.0 * c + d) + 6.0 * t * (a - 2.0 * b + c) + 3.0 * (-a + b)
}

/// Catmull-Rom coordinate at `t` between `b` and `c`.
pub fn curve_point(a: f32, b: f32, c: f32, d: f32, t: f32, tightness: f32) -> f32 {
    basis::eval(&basis::catmull_rom(tightness), [a, b, c, d], t)
}

/// Derivative of [`curve_point`] at `t`.
pub fn curve_tangent(a: f32, b: f32, c: f32, d: f32, t: f32, tightness: f32) -> f32 {
    basis::eval_tangent(&basis::catmull_rom(tightness), [a, b, c, d], t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const S_CURVE: [Vec3; 4] = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 100.0, 0.0),
        Vec3::new(100.0, 0.0, 0.0),
        Vec3::new(100.0, 100.0, 0.0),
    ];

    // ── forward differencing ──────────────────────────────────────────────

    #[test]
    fn bezier_matches_direct_evaluation() {
        let mut tess = CurveTessellator::new();
        let steps = tess.tessellate_bezier(S_CURVE, 100).unwrap();
        assert_eq!(steps.len(), 100);
        for (i, p) in steps.enumerate() {
            let t = (i + 1) as f32 / 100.0;
            let x = bezier_point(0.0, 0.0, 100.0, 100.0, t);
            let y = bezier_point(0.0, 100.0, 0.0, 100.0, t);
            assert!((p.x - x).abs() < 1e-3, "x at t={t}: {} vs {x}", p.x);
            assert!((p.y - y).abs() < 1e-3, "y at t={t}: {} vs {y}", p.y);
        }
    }

    #[test]
    fn long_runs_do_not_drift() {
        let mut tess = CurveTessellator::new();
        let last = tess.tessellate_bezier(S_CURVE, 800).unwrap().last().unwrap();
        assert!(last.chebyshev(S_CURVE[3]) < 1e-3);
    }

    #[test]
    fn catmull_rom_ends_on_inner_points() {
        let pts = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 5.0, 1.0),
            Vec3::new(20.0, -5.0, 2.0),
            Vec3::new(30.0, 0.0, 3.0),
        ];
        let mut tess = CurveTessellator::new();
        let steps = tess.tessellate_catmull_rom(pts, 16, 0.0).unwrap();
        assert!(steps.start().chebyshev(pts[1]) < 1e-5);
        let out: Vec<_> = steps.collect();
        assert!(out[15].chebyshev(pts[2]) < 1e-4);
        for (i, p) in out.iter().enumerate() {
            let t = (i + 1) as f32 / 16.0;
            assert!((p.y - curve_point(0.0, 5.0, -5.0, 0.0, t, 0.0)).abs() < 1e-4);
        }
    }

    #[test]
    fn clone_replays_sequence() {
        let mut tess = CurveTessellator::new();
        let steps = tess.tessellate_bezier(S_CURVE, 10).unwrap();
        let a: Vec<_> = steps.clone().collect();
        let b: Vec<_> = steps.collect();
        assert_eq!(a, b);
    }

    // ── memoization ───────────────────────────────────────────────────────

    #[test]
    fn matrices_rebuild_only_on_change() {
        let mut tess = CurveTessellator::new();
        tess.tessellate_bezier(S_CURVE, 20).unwrap();
        tess.tessellate_bezier(S_CURVE, 20).unwrap();
        assert_eq!(tess.rebuilds(), 1);
        tess.tessellate_bezier(S_CURVE, 21).unwrap();
        assert_eq!(tess.rebuilds(), 2);

        tess.tessellate_catmull_rom(S_CURVE, 20, 0.0).unwrap();
        tess.tessellate_catmull_rom(S_CURVE, 20, 0.0).unwrap();
        assert_eq!(tess.rebuilds(), 3);
        tess.tessellate_catmull_rom(S_CURVE, 20, 0.5).unwrap();
        assert_eq!(tess.rebuilds(), 4);
    }

    #[test]
    fn zero_steps_rejected() {
        let mut tess = CurveTessellator::new();
        assert!(tess.tessellate_bezier(S_CURVE, 0).is_err());
        assert!(tess.tessellate_catmull_rom(S_CURVE, 0, 0.0).is_err());
        assert!(tess.tessellate_catmull_rom(S_CURVE, 4, f32::NAN).is_err());
    }

    // ── direct evaluators ─────────────────────────────────────────────────

    #[test]
    fn bezier_tangent_matches_finite_difference() {
        let t = 0.3;
        let h = 1e-3;
        let numeric = (bezier_point(0.0, 40.0, 60.0, 100.0, t + h) - bezier_point(0.0, 40.0, 60.0, 100.0, t - h)) / (2.0 * h);
        assert!((bezier_tangent(0.0, 40.0, 60.0, 100.0, t) - numeric).abs() < 0.05);
    }

    #[test]
    fn curve_tangent_matches_finite_difference() {
        let t = 0.6;
        let h = 1e-3;
        let f = |t| curve_point(0.0, 10.0, 30.0, 35.0, t, 0.2);
        let numeric = (f(t + h) - f(t - h)) / (2.0 * h);
        assert!((curve_tangent(0.0, 10.0, 30.0, 35.0, t, 0.2) - numeric).abs() < 0.05);
    }
}
