use crate::coords::Vec2;
use crate::error::DrawResult;
use crate::geometry::{CloseMode, ShapeKind, Vertex};
use crate::pixels::PixelBuffer;
use crate::style::{StrokeCap, StrokeJoin};

use super::raster::Mask;
use super::{Backend, Capability, ShapeRef};

/// CPU scanline rasterizer for flat, untextured shapes.
///
/// Fill color is taken per primitive from its first vertex, stroke color and
/// weight from the shape's first vertex.
#[derive(Debug, Default, Clone)]
pub struct SoftwareBackend {
    /// Reused polygon scratch.
    poly: Vec<Vec2>,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[inline]
fn xy(v: &Vertex) -> Vec2 {
    Vec2::new(v.position[0], v.position[1])
}

/// Index groups that form the filled faces of a shape.
fn faces(kind: ShapeKind, n: usize) -> Vec<Vec<usize>> {
    match kind {
        ShapeKind::Points | ShapeKind::Lines => Vec::new(),
        ShapeKind::Triangles => (0..n / 3).map(|t| vec![3 * t, 3 * t + 1, 3 * t + 2]).collect(),
        ShapeKind::TriangleFan => (1..n.saturating_sub(1)).map(|i| vec![0, i, i + 1]).collect(),
        ShapeKind::TriangleStrip => (0..n.saturating_sub(2)).map(|i| vec![i, i + 1, i + 2]).collect(),
        ShapeKind::Quads => (0..n / 4).map(|q| (4 * q..4 * q + 4).collect()).collect(),
        ShapeKind::QuadStrip => (0..n.saturating_sub(2) / 2)
            .map(|i| vec![2 * i, 2 * i + 1, 2 * i + 3, 2 * i + 2])
            .collect(),
        ShapeKind::Polygon => {
            if n >= 3 {
                vec![(0..n).collect()]
            } else {
                Vec::new()
            }
        }
    }
}

/// Outline segments `(from, to)` for the stroke.
fn outline(kind: ShapeKind, close: CloseMode, n: usize) -> Vec<(usize, usize)> {
    let ring = |idx: Vec<usize>| {
        let m = idx.len();
        (0..m).map(move |i| (idx[i], idx[(i + 1) % m])).collect::<Vec<_>>()
    };
    match kind {
        ShapeKind::Points => Vec::new(),
        ShapeKind::Lines => (0..n / 2).map(|i| (2 * i, 2 * i + 1)).collect(),
        ShapeKind::Polygon => {
            let mut segs: Vec<_> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
            if close == CloseMode::Close && n > 2 {
                segs.push((n - 1, 0));
            }
            segs
        }
        _ => faces(kind, n).into_iter().flat_map(ring).collect(),
    }
}

impl Backend for SoftwareBackend {
    fn name(&self) -> &str {
        "software"
    }

    fn supports(&self, capability: Capability) -> bool {
        capability == Capability::TwoD
    }

    fn draw(&mut self, target: &mut PixelBuffer, shape: &ShapeRef<'_>) -> DrawResult<()> {
        let verts = shape.vertices;
        let Some(first) = verts.first() else { return Ok(()) };
        log::trace!("software: {:?} with {} vertices", shape.kind, verts.len());

        let weight = first.stroke_weight.max(0.0);
        let (w, h) = (target.width(), target.height());

        if shape.fill {
            for face in faces(shape.kind, verts.len()) {
                self.poly.clear();
                self.poly.extend(face.iter().map(|&i| xy(&verts[i])));
                let Some(mut mask) = Mask::around(self.poly.iter().copied(), 1.0, w, h) else { continue };
                mask.fill_polygon(&self.poly);
                mask.blend_into(target, verts[face[0]].fill_argb(), shape.blend_mode);
            }
        }

        if shape.stroke {
            let Some(mut mask) = Mask::around(verts.iter().map(xy), weight + 1.0, w, h) else {
                return Ok(());
            };
            if shape.kind == ShapeKind::Points {
                for v in verts {
                    match (weight > 1.0, shape.stroke_cap) {
                        (false, _) => mask.point(xy(v)),
                        (true, StrokeCap::Round) => mask.disc(xy(v), weight),
                        (true, _) => mask.square(xy(v), weight),
                    }
                }
            } else {
                let segments = outline(shape.kind, shape.close, verts.len());
                for &(a, b) in &segments {
                    if !verts[a].edge() {
                        continue;
                    }
                    let (pa, pb) = (xy(&verts[a]), xy(&verts[b]));
                    if weight <= 1.0 {
                        mask.hairline(pa, pb);
                    } else {
                        mask.thick_segment(pa, pb, weight, shape.stroke_cap == StrokeCap::Project);
                        if shape.stroke_cap == StrokeCap::Round || shape.stroke_join == StrokeJoin::Round {
                            mask.disc(pa, weight);
                            mask.disc(pb, weight);
                        }
                    }
                }
            }
            mask.blend_into(target, first.stroke_argb(), shape.blend_mode);
        }
        Ok(())
    }
}
