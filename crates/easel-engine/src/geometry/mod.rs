//! Vertex storage and the shape-build state machine.

mod shape;
mod vertex;

pub use shape::{
    CloseMode, CurveDetail, FinishedShape, NormalMode, ShapeBuilder, ShapeKind, TextureMode, VertexPaint,
};
pub use vertex::{INITIAL_CAPACITY, VERTEX_FIELDS, Vertex, VertexBuffer};
