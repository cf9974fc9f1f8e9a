use crate::composite::{BlendMode, Compositor};
use crate::coords::PixelRect;

use super::PixelBuffer;

/// Capability shared by everything that owns pixels and can be drawn into.
///
/// Both plain images and drawing surfaces implement it, so compositing code
/// can target either without caring which one it holds.
pub trait Canvas {
    fn pixel_buffer(&self) -> &PixelBuffer;
    fn pixel_buffer_mut(&mut self) -> &mut PixelBuffer;

    /// Sampling used when regions are copied at a different size.
    fn compositor(&self) -> Compositor {
        Compositor::default()
    }

    fn width(&self) -> usize {
        self.pixel_buffer().width()
    }

    fn height(&self) -> usize {
        self.pixel_buffer().height()
    }

    fn get(&self, x: i32, y: i32) -> u32 {
        self.pixel_buffer().get(x, y)
    }

    fn set(&mut self, x: i32, y: i32, argb: u32) {
        self.pixel_buffer_mut().set(x, y, argb);
    }

    /// Copies `src` onto `dst` inside this canvas, resizing if needed.
    fn copy_within(&mut self, src: PixelRect, dst: PixelRect) {
        let compositor = self.compositor();
        compositor.blend_within(self.pixel_buffer_mut(), src, dst, BlendMode::Replace);
    }

    /// Blends a region of this canvas onto another region of itself.
    fn blend_within(&mut self, src: PixelRect, dst: PixelRect, mode: BlendMode) {
        let compositor = self.compositor();
        compositor.blend_within(self.pixel_buffer_mut(), src, dst, mode);
    }

    /// Blends a region of another image onto this canvas.
    fn blend_from(&mut self, image: &PixelBuffer, src: PixelRect, dst: PixelRect, mode: BlendMode) {
        let compositor = self.compositor();
        compositor.blend(image, src, self.pixel_buffer_mut(), dst, mode);
    }
}

impl Canvas for PixelBuffer {
    fn pixel_buffer(&self) -> &PixelBuffer {
        self
    }

    fn pixel_buffer_mut(&mut self) -> &mut PixelBuffer {
        self
    }
}
