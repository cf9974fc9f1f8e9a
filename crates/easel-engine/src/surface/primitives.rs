use std::f32::consts::TAU;

use crate::backend::Capability;
use crate::coords::Vec3;
use crate::error::{DrawError, DrawResult};
use crate::geometry::{CloseMode, FinishedShape, ShapeKind, VertexPaint};
use crate::style::ArcMode;

use super::Surface;

/// Lower bound on ellipse and full-circle arc resolution.
const MIN_SEGMENTS: usize = 20;
const MAX_SEGMENTS: usize = 200;

/// Perimeter resolution for an ellipse with radii `rx`, `ry`.
fn ellipse_segments(rx: f32, ry: f32) -> usize {
    let avg = (rx.abs() + ry.abs()) / 2.0;
    ((TAU * avg / 10.0) as usize).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl Surface {
    pub(crate) fn check_closed(&self, what: &str) -> DrawResult<()> {
        if self.shape.is_open() {
            return Err(DrawError::invalid_sequence(format!("{what} inside begin_shape/end_shape")));
        }
        Ok(())
    }

    /// Runs one complete internal session and hands it to the backend.
    ///
    /// The session is abandoned if `build` fails, so the builder is closed
    /// again on every path.
    fn session(
        &mut self,
        kind: ShapeKind,
        close: CloseMode,
        fill: bool,
        stroke: bool,
        build: impl FnOnce(&mut Self, &VertexPaint) -> DrawResult<()>,
    ) -> DrawResult<()> {
        if !fill && !stroke {
            return Ok(());
        }
        self.shape.begin_shape(kind)?;
        let paint = self.style.vertex_paint();
        if let Err(e) = build(self, &paint) {
            self.shape.abandon();
            return Err(e);
        }
        let done = self.shape.end_shape(close)?;
        self.dispatch(FinishedShape { textured: false, ..done }, fill, stroke)
    }

    fn emit(&mut self, kind: ShapeKind, close: CloseMode, points: &[Vec3], fill: bool, stroke: bool) -> DrawResult<()> {
        self.session(kind, close, fill, stroke, |s, paint| {
            for &p in points {
                s.shape.vertex(p, paint)?;
            }
            Ok(())
        })
    }

    /// Fill and stroke as currently enabled.
    fn painted(&self) -> (bool, bool) {
        (self.style.fill.enabled, self.style.stroke.enabled)
    }

    // ── 2D primitives ─────────────────────────────────────────────────────

    /// A single point in the stroke color.
    pub fn point(&mut self, x: f32, y: f32) -> DrawResult<()> {
        self.check_closed("point()")?;
        let stroke = self.style.stroke.enabled;
        self.emit(ShapeKind::Points, CloseMode::Open, &[Vec3::from_2d(x, y)], false, stroke)
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> DrawResult<()> {
        self.check_closed("line()")?;
        let stroke = self.style.stroke.enabled;
        let points = [Vec3::from_2d(x1, y1), Vec3::from_2d(x2, y2)];
        self.emit(ShapeKind::Lines, CloseMode::Open, &points, false, stroke)
    }

    pub fn triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> DrawResult<()> {
        self.check_closed("triangle()")?;
        let (fill, stroke) = self.painted();
        let points = [Vec3::from_2d(x1, y1), Vec3::from_2d(x2, y2), Vec3::from_2d(x3, y3)];
        self.emit(ShapeKind::Triangles, CloseMode::Close, &points, fill, stroke)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn quad(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32, x4: f32, y4: f32) -> DrawResult<()> {
        self.check_closed("quad()")?;
        let (fill, stroke) = self.painted();
        let points = [
            Vec3::from_2d(x1, y1),
            Vec3::from_2d(x2, y2),
            Vec3::from_2d(x3, y3),
            Vec3::from_2d(x4, y4),
        ];
        self.emit(ShapeKind::Quads, CloseMode::Close, &points, fill, stroke)
    }

    /// Axis-aligned rectangle placed by the rect mode.
    pub fn rect(&mut self, a: f32, b: f32, c: f32, d: f32) -> DrawResult<()> {
        self.check_closed("rect()")?;
        let (x, y, w, h) = self.style.rect_mode.resolve(a, b, c, d);
        let (fill, stroke) = self.painted();
        let points = [
            Vec3::from_2d(x, y),
            Vec3::from_2d(x + w, y),
            Vec3::from_2d(x + w, y + h),
            Vec3::from_2d(x, y + h),
        ];
        self.emit(ShapeKind::Quads, CloseMode::Close, &points, fill, stroke)
    }

    /// Rectangle with per-corner radii: top-left, top-right, bottom-right,
    /// bottom-left. Radii are clamped to half the shorter side.
    #[allow(clippy::too_many_arguments)]
    pub fn rect_rounded(
        &mut self,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        tl: f32,
        tr: f32,
        br: f32,
        bl: f32,
    ) -> DrawResult<()> {
        self.check_closed("rect()")?;
        let (x, y, w, h) = self.style.rect_mode.resolve(a, b, c, d);
        let limit = w.min(h) / 2.0;
        let [tl, tr, br, bl] = [tl, tr, br, bl].map(|r| if r.is_finite() { r.clamp(0.0, limit) } else { 0.0 });
        if tl == 0.0 && tr == 0.0 && br == 0.0 && bl == 0.0 {
            return self.rect(a, b, c, d);
        }

        let (fill, stroke) = self.painted();
        let detail = self.style.curve;
        self.session(ShapeKind::Polygon, CloseMode::Close, fill, stroke, |s, paint| {
            let (r, bt) = (x + w, y + h);
            let corner = |s: &mut Surface, ctrl: (f32, f32), end: (f32, f32), radius: f32| {
                if radius > 0.0 {
                    s.shape.quadratic_vertex(
                        Vec3::from_2d(ctrl.0, ctrl.1),
                        Vec3::from_2d(end.0, end.1),
                        &mut s.curves,
                        detail,
                        paint,
                    )
                } else {
                    Ok(())
                }
            };
            s.shape.vertex(Vec3::from_2d(x + tl, y), paint)?;
            s.shape.vertex(Vec3::from_2d(r - tr, y), paint)?;
            corner(s, (r, y), (r, y + tr), tr)?;
            s.shape.vertex(Vec3::from_2d(r, bt - br), paint)?;
            corner(s, (r, bt), (r - br, bt), br)?;
            s.shape.vertex(Vec3::from_2d(x + bl, bt), paint)?;
            corner(s, (x, bt), (x, bt - bl), bl)?;
            s.shape.vertex(Vec3::from_2d(x, y + tl), paint)?;
            corner(s, (x, y), (x + tl, y), tl)?;
            Ok(())
        })
    }

    /// Ellipse placed by the ellipse mode.
    pub fn ellipse(&mut self, a: f32, b: f32, c: f32, d: f32) -> DrawResult<()> {
        self.check_closed("ellipse()")?;
        let (x, y, w, h) = self.style.ellipse_mode.resolve(a, b, c, d);
        if !all_finite(&[x, y, w, h]) {
            return Ok(());
        }
        let (rx, ry) = (w / 2.0, h / 2.0);
        let (cx, cy) = (x + rx, y + ry);
        let n = ellipse_segments(rx, ry);
        let points: Vec<Vec3> = (0..n)
            .map(|i| {
                let (sin, cos) = (TAU * i as f32 / n as f32).sin_cos();
                Vec3::from_2d(cx + rx * cos, cy + ry * sin)
            })
            .collect();
        let (fill, stroke) = self.painted();
        self.emit(ShapeKind::Polygon, CloseMode::Close, &points, fill, stroke)
    }

    /// Elliptical arc from `start` to `stop` radians, clockwise on screen.
    ///
    /// `Open` fills the chord region but strokes only the curve; `Chord`
    /// strokes the closing chord too; `Pie` runs both edges to the center.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(&mut self, a: f32, b: f32, c: f32, d: f32, start: f32, stop: f32, mode: ArcMode) -> DrawResult<()> {
        self.check_closed("arc()")?;
        let (x, y, w, h) = self.style.ellipse_mode.resolve(a, b, c, d);
        if !all_finite(&[x, y, w, h, start, stop]) || stop <= start {
            return Ok(());
        }
        let shift = start.rem_euclid(TAU) - start;
        let (start, stop) = (start + shift, stop + shift);
        let sweep = (stop - start).min(TAU);

        let (rx, ry) = (w / 2.0, h / 2.0);
        let (cx, cy) = (x + rx, y + ry);
        let full = ellipse_segments(rx, ry);
        let n = ((full as f32 * sweep / TAU).ceil() as usize).max(1);
        let mut points: Vec<Vec3> = (0..=n)
            .map(|i| {
                let (sin, cos) = (start + sweep * i as f32 / n as f32).sin_cos();
                Vec3::from_2d(cx + rx * cos, cy + ry * sin)
            })
            .collect();

        let (fill, stroke) = self.painted();
        match mode {
            ArcMode::Open => {
                self.emit(ShapeKind::Polygon, CloseMode::Close, &points, fill, false)?;
                self.emit(ShapeKind::Polygon, CloseMode::Open, &points, false, stroke)
            }
            ArcMode::Chord => self.emit(ShapeKind::Polygon, CloseMode::Close, &points, fill, stroke),
            ArcMode::Pie => {
                points.insert(0, Vec3::from_2d(cx, cy));
                self.emit(ShapeKind::Polygon, CloseMode::Close, &points, fill, stroke)
            }
        }
    }

    /// Catmull-Rom segment between the middle two of four control points.
    #[allow(clippy::too_many_arguments)]
    pub fn curve(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32, x4: f32, y4: f32) -> DrawResult<()> {
        self.check_closed("curve()")?;
        let (fill, stroke) = self.painted();
        let detail = self.style.curve;
        self.session(ShapeKind::Polygon, CloseMode::Open, fill, stroke, |s, paint| {
            for (px, py) in [(x1, y1), (x2, y2), (x3, y3), (x4, y4)] {
                s.shape.curve_vertex(Vec3::from_2d(px, py), &mut s.curves, detail, paint)?;
            }
            Ok(())
        })
    }

    /// Cubic Bezier from `(x1, y1)` to `(x2, y2)`.
    #[allow(clippy::too_many_arguments)]
    pub fn bezier(&mut self, x1: f32, y1: f32, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x2: f32, y2: f32) -> DrawResult<()> {
        self.check_closed("bezier()")?;
        let (fill, stroke) = self.painted();
        let detail = self.style.curve;
        self.session(ShapeKind::Polygon, CloseMode::Open, fill, stroke, |s, paint| {
            s.shape.vertex(Vec3::from_2d(x1, y1), paint)?;
            s.shape.bezier_vertex(
                Vec3::from_2d(cx1, cy1),
                Vec3::from_2d(cx2, cy2),
                Vec3::from_2d(x2, y2),
                &mut s.curves,
                detail,
                paint,
            )
        })
    }

    // ── 3D primitives ─────────────────────────────────────────────────────

    /// Box of the given extents centred on the origin, as six quads.
    pub fn box_(&mut self, w: f32, h: f32, d: f32) -> DrawResult<()> {
        self.check_closed("box_()")?;
        if self.unsupported("box_()", Capability::ThreeD) {
            return Ok(());
        }
        let (x, y, z) = (w / 2.0, h / 2.0, d / 2.0);
        let c = |sx: f32, sy: f32, sz: f32| Vec3::new(sx * x, sy * y, sz * z);
        #[rustfmt::skip]
        let faces = [
            c(-1.0, -1.0,  1.0), c( 1.0, -1.0,  1.0), c( 1.0,  1.0,  1.0), c(-1.0,  1.0,  1.0), // front
            c( 1.0, -1.0,  1.0), c( 1.0, -1.0, -1.0), c( 1.0,  1.0, -1.0), c( 1.0,  1.0,  1.0), // right
            c( 1.0, -1.0, -1.0), c(-1.0, -1.0, -1.0), c(-1.0,  1.0, -1.0), c( 1.0,  1.0, -1.0), // back
            c(-1.0, -1.0, -1.0), c(-1.0, -1.0,  1.0), c(-1.0,  1.0,  1.0), c(-1.0,  1.0, -1.0), // left
            c(-1.0, -1.0, -1.0), c( 1.0, -1.0, -1.0), c( 1.0, -1.0,  1.0), c(-1.0, -1.0,  1.0), // top
            c(-1.0,  1.0,  1.0), c( 1.0,  1.0,  1.0), c( 1.0,  1.0, -1.0), c(-1.0,  1.0, -1.0), // bottom
        ];
        let (fill, stroke) = self.painted();
        self.emit(ShapeKind::Quads, CloseMode::Close, &faces, fill, stroke)
    }

    /// Sphere of radius `r` centred on the origin, one triangle strip per
    /// latitude band of the cached unit table.
    pub fn sphere(&mut self, r: f32) -> DrawResult<()> {
        self.check_closed("sphere()")?;
        if self.unsupported("sphere()", Capability::ThreeD) {
            return Ok(());
        }
        let table = self.spheres.table(self.style.sphere_detail);
        let bands: Vec<Vec<Vec3>> = (0..table.bands())
            .map(|ring| table.band(ring).map(|p| p * r).collect())
            .collect();
        let (fill, stroke) = self.painted();
        for band in &bands {
            self.emit(ShapeKind::TriangleStrip, CloseMode::Open, band, fill, stroke)?;
        }
        Ok(())
    }
}
