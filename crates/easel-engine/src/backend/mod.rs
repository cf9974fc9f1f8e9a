//! Rendering strategies a surface hands finished shapes to.
//!
//! The surface tessellates; a [`Backend`] turns the vertex stream into
//! pixels (or records it for an external renderer).

mod raster;
mod recording;
mod software;

pub use recording::{RecordedShape, RecordingBackend};
pub use software::SoftwareBackend;

use crate::composite::BlendMode;
use crate::error::DrawResult;
use crate::geometry::{CloseMode, ShapeKind, Vertex};
use crate::pixels::PixelBuffer;
use crate::style::{StrokeCap, StrokeJoin};

/// Optional feature a backend may provide.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Capability {
    /// Flat shapes in the XY plane.
    TwoD,
    /// Depth-bearing geometry (`box_`, `sphere`).
    ThreeD,
    /// Texture-mapped vertices.
    Texture,
}

/// Read-only view of one finished shape plus the style it was drawn with.
#[derive(Debug, Copy, Clone)]
pub struct ShapeRef<'a> {
    pub kind: ShapeKind,
    pub close: CloseMode,
    pub vertices: &'a [Vertex],
    pub fill: bool,
    pub stroke: bool,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
    pub blend_mode: BlendMode,
    pub texture: Option<&'a PixelBuffer>,
}

pub trait Backend: Send {
    fn name(&self) -> &str;

    fn supports(&self, capability: Capability) -> bool;

    /// Renders `shape` into `target`.
    fn draw(&mut self, target: &mut PixelBuffer, shape: &ShapeRef<'_>) -> DrawResult<()>;
}
