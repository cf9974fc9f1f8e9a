use std::sync::{Arc, Mutex, PoisonError};

use crate::composite::BlendMode;
use crate::error::DrawResult;
use crate::geometry::{CloseMode, ShapeKind, Vertex};
use crate::pixels::PixelBuffer;

use super::{Backend, Capability, ShapeRef};

/// Owned copy of a finished shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedShape {
    pub kind: ShapeKind,
    pub close: CloseMode,
    pub vertices: Vec<Vertex>,
    pub fill: bool,
    pub stroke: bool,
    pub blend_mode: BlendMode,
    pub textured: bool,
}

/// Accepts every capability and stores shapes instead of drawing them.
///
/// Clones share one log, so a caller can keep a handle after boxing the
/// backend into a surface.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    shapes: Arc<Mutex<Vec<RecordedShape>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out everything recorded so far.
    pub fn shapes(&self) -> Vec<RecordedShape> {
        self.shapes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<RecordedShape> {
        std::mem::take(&mut *self.shapes.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn supports(&self, _capability: Capability) -> bool {
        true
    }

    fn draw(&mut self, _target: &mut PixelBuffer, shape: &ShapeRef<'_>) -> DrawResult<()> {
        log::trace!("recording {:?} with {} vertices", shape.kind, shape.vertices.len());
        let recorded = RecordedShape {
            kind: shape.kind,
            close: shape.close,
            vertices: shape.vertices.to_vec(),
            fill: shape.fill,
            stroke: shape.stroke,
            blend_mode: shape.blend_mode,
            textured: shape.texture.is_some(),
        };
        self.shapes.lock().unwrap_or_else(PoisonError::into_inner).push(recorded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{StrokeCap, StrokeJoin};

    #[test]
    fn clones_share_the_log() {
        let handle = RecordingBackend::new();
        let mut backend: Box<dyn Backend> = Box::new(handle.clone());
        let mut target = PixelBuffer::new(1, 1, crate::pixels::PixelFormat::Rgb);
        let shape = ShapeRef {
            kind: ShapeKind::Points,
            close: CloseMode::Open,
            vertices: &[],
            fill: false,
            stroke: true,
            stroke_cap: StrokeCap::Round,
            stroke_join: StrokeJoin::Miter,
            blend_mode: BlendMode::Blend,
            texture: None,
        };
        backend.draw(&mut target, &shape).unwrap();
        assert!(backend.supports(Capability::ThreeD));
        assert_eq!(handle.shapes().len(), 1);
        assert_eq!(handle.take()[0].kind, ShapeKind::Points);
        assert!(handle.shapes().is_empty());
        assert!(target.dirty().is_none());
    }
}
