use bytemuck::Zeroable;

use crate::coords::Vec3;
use crate::curve::CurveTessellator;
use crate::error::{DrawError, DrawResult};

use super::vertex::{Vertex, VertexBuffer};

/// Primitive assembly rule for a shape session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ShapeKind {
    Points,
    Lines,
    Triangles,
    TriangleFan,
    TriangleStrip,
    Quads,
    QuadStrip,
    /// Free-form outline; the only kind that accepts curve vertices.
    #[default]
    Polygon,
}

/// Whether `end_shape` joins the last vertex back to the first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum CloseMode {
    #[default]
    Open,
    Close,
}

/// Where vertex normals come from. Only ever advances within a session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub enum NormalMode {
    /// No explicit normal.
    #[default]
    Auto,
    /// One normal set before the first vertex, shared by all.
    Shape,
    /// Normals change between vertices.
    Vertex,
}

/// How `u`/`v` passed with a vertex are interpreted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TextureMode {
    /// Texel coordinates, divided by the texture size.
    #[default]
    Image,
    /// Already normalized.
    Normal,
}

/// Per-vertex colors and material channels captured from the current style.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexPaint {
    pub fill: [f32; 4],
    pub stroke: [f32; 4],
    pub stroke_weight: f32,
    pub ambient: [f32; 3],
    pub specular: [f32; 3],
    pub emissive: [f32; 3],
    pub shininess: f32,
}

impl Default for VertexPaint {
    fn default() -> Self {
        Self {
            fill: [1.0; 4],
            stroke: [0.0, 0.0, 0.0, 1.0],
            stroke_weight: 1.0,
            ambient: [0.8; 3],
            specular: [0.5; 3],
            emissive: [0.0; 3],
            shininess: 1.0,
        }
    }
}

/// Subdivision settings for curve vertices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CurveDetail {
    pub bezier_steps: u32,
    pub curve_steps: u32,
    pub tightness: f32,
}

impl Default for CurveDetail {
    fn default() -> Self {
        Self { bezier_steps: 20, curve_steps: 20, tightness: 0.0 }
    }
}

/// A session that `end_shape` just closed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FinishedShape {
    pub kind: ShapeKind,
    pub close: CloseMode,
    pub normal_mode: NormalMode,
    pub textured: bool,
}

#[derive(Debug, Copy, Clone)]
struct Session {
    kind: ShapeKind,
    /// Index of the session's first vertex in the buffer.
    start: usize,
}

/// Polygon-duplicate tolerance per axis.
const DUPLICATE_EPSILON: f32 = 1e-4;

/// Shape-build state machine: Closed → Open(kind) → Closed.
///
/// Vertices of the most recent session stay readable through
/// [`vertices`](Self::vertices) until the next `begin_shape`.
#[derive(Debug, Default, Clone)]
pub struct ShapeBuilder {
    buffer: VertexBuffer,
    session: Option<Session>,
    last: Option<(ShapeKind, usize)>,
    normal: Vec3,
    normal_mode: NormalMode,
    edge: bool,
    texture_size: Option<(f32, f32)>,
    texture_mode: TextureMode,
    /// Last Catmull-Rom control points, oldest first.
    curve_window: Vec<Vec3>,
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self { edge: true, ..Self::default() }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        self.session.map(|s| s.kind)
    }

    pub fn normal_mode(&self) -> NormalMode {
        self.normal_mode
    }

    pub fn buffer(&self) -> &VertexBuffer {
        &self.buffer
    }

    /// Vertices of the open session, or of the last finished one.
    pub fn vertices(&self) -> &[Vertex] {
        let start = match (self.session, self.last) {
            (Some(s), _) => s.start,
            (None, Some((_, start))) => start,
            (None, None) => return &[],
        };
        &self.buffer.as_slice()[start..]
    }

    // ── session ───────────────────────────────────────────────────────────

    pub fn begin_shape(&mut self, kind: ShapeKind) -> DrawResult<()> {
        if let Some(open) = self.session {
            return Err(DrawError::invalid_sequence(format!(
                "begin_shape({kind:?}) while a {:?} shape is still open",
                open.kind
            )));
        }
        self.buffer.clear();
        self.last = None;
        self.session = Some(Session { kind, start: 0 });
        self.normal_mode = NormalMode::Auto;
        self.curve_window.clear();
        Ok(())
    }

    pub fn end_shape(&mut self, close: CloseMode) -> DrawResult<FinishedShape> {
        let Some(session) = self.session.take() else {
            return Err(DrawError::invalid_sequence("end_shape without begin_shape"));
        };
        self.last = Some((session.kind, session.start));
        self.curve_window.clear();
        Ok(FinishedShape {
            kind: session.kind,
            close,
            normal_mode: self.normal_mode,
            textured: self.texture_size.is_some(),
        })
    }

    fn open_session(&self, what: &str) -> DrawResult<Session> {
        self.session
            .ok_or_else(|| DrawError::invalid_sequence(format!("{what} outside begin_shape/end_shape")))
    }

    fn open_polygon(&self, what: &str) -> DrawResult<Session> {
        let session = self.open_session(what)?;
        if session.kind != ShapeKind::Polygon {
            return Err(DrawError::invalid_sequence(format!(
                "{what} needs a free-form polygon shape, not {:?}",
                session.kind
            )));
        }
        Ok(session)
    }

    // ── attribute state ───────────────────────────────────────────────────

    /// Sets the normal for following vertices and advances the normal mode.
    pub fn normal(&mut self, n: Vec3) {
        self.normal = n;
        if let Some(session) = self.session {
            let next = if self.buffer.len() == session.start { NormalMode::Shape } else { NormalMode::Vertex };
            self.normal_mode = self.normal_mode.max(next);
        }
    }

    pub fn edge(&mut self, edge: bool) {
        self.edge = edge;
    }

    /// Binds a texture of the given size, or unbinds with `None`.
    pub fn set_texture(&mut self, size: Option<(usize, usize)>) {
        self.texture_size = size.map(|(w, h)| (w as f32, h as f32));
    }

    pub fn texture_mode(&mut self, mode: TextureMode) {
        self.texture_mode = mode;
    }

    pub fn has_texture(&self) -> bool {
        self.texture_size.is_some()
    }

    // ── vertices ──────────────────────────────────────────────────────────

    /// Appends one vertex. Returns `false` when it duplicated the previous
    /// polygon vertex and was dropped.
    pub fn vertex(&mut self, pos: Vec3, paint: &VertexPaint) -> DrawResult<bool> {
        self.open_session("vertex()")?;
        self.curve_window.clear();
        Ok(self.push(pos, [0.0, 0.0], paint))
    }

    /// Appends a textured vertex; `uv` follows the texture mode.
    pub fn vertex_uv(&mut self, pos: Vec3, u: f32, v: f32, paint: &VertexPaint) -> DrawResult<bool> {
        self.open_session("vertex()")?;
        let Some((tw, th)) = self.texture_size else {
            return Err(DrawError::invalid_sequence("texture coordinates given without a texture"));
        };
        let (u, v) = match self.texture_mode {
            TextureMode::Image => (u / tw, v / th),
            TextureMode::Normal => (u, v),
        };
        self.curve_window.clear();
        Ok(self.push(pos, [unit(u), unit(v)], paint))
    }

    /// Cubic Bezier from the previous vertex through two control points to `end`.
    pub fn bezier_vertex(
        &mut self,
        c1: Vec3,
        c2: Vec3,
        end: Vec3,
        curves: &mut CurveTessellator,
        detail: CurveDetail,
        paint: &VertexPaint,
    ) -> DrawResult<()> {
        let anchor = self.anchor("bezier_vertex()")?;
        let steps = curves.tessellate_bezier([anchor, c1, c2, end], detail.bezier_steps)?;
        self.curve_window.clear();
        for p in steps {
            self.push(p, [0.0, 0.0], paint);
        }
        Ok(())
    }

    /// Quadratic Bezier from the previous vertex, raised to a cubic.
    pub fn quadratic_vertex(
        &mut self,
        control: Vec3,
        end: Vec3,
        curves: &mut CurveTessellator,
        detail: CurveDetail,
        paint: &VertexPaint,
    ) -> DrawResult<()> {
        let anchor = self.anchor("quadratic_vertex()")?;
        let c1 = anchor + (control - anchor) * (2.0 / 3.0);
        let c2 = end + (control - end) * (2.0 / 3.0);
        self.bezier_vertex(c1, c2, end, curves, detail, paint)
    }

    /// Adds a Catmull-Rom control point; from the fourth one on each call
    /// emits the segment between the middle two points of the window.
    pub fn curve_vertex(
        &mut self,
        p: Vec3,
        curves: &mut CurveTessellator,
        detail: CurveDetail,
        paint: &VertexPaint,
    ) -> DrawResult<()> {
        self.open_polygon("curve_vertex()")?;
        if self.curve_window.len() == 4 {
            self.curve_window.remove(0);
        }
        self.curve_window.push(p);
        if let [a, b, c, d] = self.curve_window[..] {
            let steps = curves.tessellate_catmull_rom([a, b, c, d], detail.curve_steps, detail.tightness)?;
            self.push(steps.start(), [0.0, 0.0], paint);
            for q in steps {
                self.push(q, [0.0, 0.0], paint);
            }
        }
        Ok(())
    }

    fn anchor(&self, what: &str) -> DrawResult<Vec3> {
        let session = self.open_polygon(what)?;
        if self.buffer.len() == session.start {
            return Err(DrawError::invalid_sequence(format!("{what} needs a vertex() to start from")));
        }
        let last = self.buffer.last().map(|v| Vec3::from(v.position));
        last.ok_or_else(|| DrawError::invalid_sequence(format!("{what} needs a vertex() to start from")))
    }

    fn push(&mut self, pos: Vec3, uv: [f32; 2], paint: &VertexPaint) -> bool {
        let Some(session) = self.session else { return false };
        if session.kind == ShapeKind::Polygon && self.buffer.len() > session.start {
            if let Some(prev) = self.buffer.last() {
                if Vec3::from(prev.position).chebyshev(pos) < DUPLICATE_EPSILON {
                    return false;
                }
            }
        }

        let mut v = Vertex::zeroed();
        v.position = pos.to_array();
        v.transformed = pos.to_array();
        v.view = [pos.x, pos.y, pos.z, 1.0];
        v.fill = paint.fill;
        v.stroke = paint.stroke;
        v.stroke_weight = paint.stroke_weight;
        v.uv = uv;
        v.normal = self.normal.to_array();
        v.has_normal = flag(self.normal_mode != NormalMode::Auto);
        v.edge = flag(self.edge);
        v.ambient = paint.ambient;
        v.specular = paint.specular;
        v.emissive = paint.emissive;
        v.shininess = paint.shininess;
        self.buffer.push(v);
        true
    }

    /// Drops the open session's vertices without drawing them.
    pub(crate) fn abandon(&mut self) {
        if let Some(session) = self.session.take() {
            self.buffer.truncate(session.start);
        }
        self.curve_window.clear();
    }
}

#[inline]
fn flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
