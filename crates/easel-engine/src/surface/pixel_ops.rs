use std::path::Path;

use anyhow::Context;

use crate::codec;
use crate::color::ColorInput;
use crate::composite::BlendMode;
use crate::coords::PixelRect;
use crate::error::{DrawError, DrawResult};
use crate::filter::Filter;
use crate::pixels::{PixelBuffer, PixelFormat};
use crate::style::PlacementMode;

use super::{ImageId, Surface, unknown_image};

impl Surface {
    // ── image registry ────────────────────────────────────────────────────

    /// Registers a new cleared image.
    pub fn create_image(&mut self, width: usize, height: usize, format: PixelFormat) -> ImageId {
        self.images.insert(PixelBuffer::new(width, height, format))
    }

    pub fn add_image(&mut self, image: PixelBuffer) -> ImageId {
        self.images.insert(image)
    }

    pub fn image_buffer(&self, id: ImageId) -> Option<&PixelBuffer> {
        self.images.get(id)
    }

    /// Mutable access; edits bump the image revision and so invalidate its
    /// tinted copies.
    pub fn image_buffer_mut(&mut self, id: ImageId) -> Option<&mut PixelBuffer> {
        self.images.get_mut(id)
    }

    /// Removes an image, its cached tinted copy and any texture binding.
    pub fn dispose_image(&mut self, id: ImageId) -> DrawResult<PixelBuffer> {
        let image = self.images.remove(id).ok_or_else(|| unknown_image(id))?;
        self.tints.evict(id);
        if self.texture == Some(id) {
            self.no_texture();
        }
        Ok(image)
    }

    /// Reads an image file and registers it.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> anyhow::Result<ImageId> {
        let image = codec::load(path)?;
        Ok(self.images.insert(image))
    }

    // ── drawing images ────────────────────────────────────────────────────

    /// Draws an image at its natural size, placed by the image mode.
    pub fn image(&mut self, id: ImageId, x: f32, y: f32) -> DrawResult<()> {
        let image = self.images.get(id).ok_or_else(|| unknown_image(id))?;
        let (w, h) = (image.width() as f32, image.height() as f32);
        let (c, d) = match self.style.image_mode {
            PlacementMode::Corners => (x + w, y + h),
            PlacementMode::Radius => (w / 2.0, h / 2.0),
            PlacementMode::Corner | PlacementMode::Center => (w, h),
        };
        self.image_sized(id, x, y, c, d)
    }

    /// Draws an image scaled into the box `(a, b, c, d)` under the image mode,
    /// multiplied by the tint when one is set.
    pub fn image_sized(&mut self, id: ImageId, a: f32, b: f32, c: f32, d: f32) -> DrawResult<()> {
        self.check_closed("image()")?;
        let (x, y, w, h) = self.style.image_mode.resolve(a, b, c, d);
        if ![x, y, w, h].iter().all(|v| v.is_finite()) {
            return Ok(());
        }
        let dst = PixelRect::new(x.round() as i32, y.round() as i32, w.round() as i32, h.round() as i32);

        let src = self.images.get(id).ok_or_else(|| unknown_image(id))?;
        let src_rect = src.bounds();
        let source = match self.style.tint.active() {
            Some(tint) => self.tints.tinted(id, src, tint.argb),
            None => src,
        };
        self.compositor.blend(source, src_rect, &mut self.pixels, dst, self.style.blend_mode);
        Ok(())
    }

    // ── background ────────────────────────────────────────────────────────

    /// Clears the whole surface to one color.
    pub fn background(&mut self, color: impl Into<ColorInput>) {
        let argb = self.color(color).argb;
        self.pixels.fill(argb);
    }

    /// Replaces every pixel with an image of exactly the surface size.
    pub fn background_image(&mut self, id: ImageId) -> DrawResult<()> {
        let image = self.images.get(id).ok_or_else(|| unknown_image(id))?;
        if (image.width(), image.height()) != (self.pixels.width(), self.pixels.height()) {
            return Err(DrawError::invalid_argument(format!(
                "background image is {}x{} but the surface is {}x{}",
                image.width(),
                image.height(),
                self.pixels.width(),
                self.pixels.height()
            )));
        }
        let converted = image.converted(self.pixels.format());
        self.pixels.pixels_mut().copy_from_slice(converted.pixels());
        Ok(())
    }

    // ── blend and copy ────────────────────────────────────────────────────

    /// Blends one region of the surface onto another, resizing if needed.
    pub fn blend(&mut self, src: PixelRect, dst: PixelRect, mode: BlendMode) {
        self.compositor.blend_within(&mut self.pixels, src, dst, mode);
    }

    pub fn copy(&mut self, src: PixelRect, dst: PixelRect) {
        self.blend(src, dst, BlendMode::Replace);
    }

    /// Blends a region of a registered image onto the surface.
    pub fn blend_image(&mut self, id: ImageId, src: PixelRect, dst: PixelRect, mode: BlendMode) -> DrawResult<()> {
        let image = self.images.get(id).ok_or_else(|| unknown_image(id))?;
        self.compositor.blend(image, src, &mut self.pixels, dst, mode);
        Ok(())
    }

    pub fn copy_image(&mut self, id: ImageId, src: PixelRect, dst: PixelRect) -> DrawResult<()> {
        self.blend_image(id, src, dst, BlendMode::Replace)
    }

    /// Blends a region of image `from` onto image `to`; both may be the same image.
    pub fn blend_between(
        &mut self,
        from: ImageId,
        to: ImageId,
        src: PixelRect,
        dst: PixelRect,
        mode: BlendMode,
    ) -> DrawResult<()> {
        let compositor = self.compositor;
        if from == to {
            let image = self.images.get_mut(to).ok_or_else(|| unknown_image(to))?;
            compositor.blend_within(image, src, dst, mode);
            return Ok(());
        }
        if self.images.get(from).is_none() {
            return Err(unknown_image(from));
        }
        let (source, target) = self.images.pair_mut(from, to).ok_or_else(|| unknown_image(to))?;
        compositor.blend(source, src, target, dst, mode);
        Ok(())
    }

    pub fn copy_between(&mut self, from: ImageId, to: ImageId, src: PixelRect, dst: PixelRect) -> DrawResult<()> {
        self.blend_between(from, to, src, dst, BlendMode::Replace)
    }

    /// Copy of a surface region.
    pub fn region(&self, rect: PixelRect) -> PixelBuffer {
        self.pixels.crop(rect)
    }

    // ── filters ───────────────────────────────────────────────────────────

    pub fn filter(&mut self, filter: Filter) {
        self.filters.apply(&mut self.pixels, filter);
    }

    pub fn filter_image(&mut self, id: ImageId, filter: Filter) -> DrawResult<()> {
        let image = self.images.get_mut(id).ok_or_else(|| unknown_image(id))?;
        self.filters.apply(image, filter);
        Ok(())
    }

    // ── persistence ───────────────────────────────────────────────────────

    /// Writes the surface; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        codec::save(path, &self.pixels).with_context(|| format!("failed to save surface to {}", path.display()))
    }

    pub fn save_image(&self, id: ImageId, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let image = self.images.get(id).ok_or_else(|| unknown_image(id))?;
        codec::save(path, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::surface::SurfaceConfig;

    fn surface(w: usize, h: usize) -> Surface {
        Surface::new(SurfaceConfig::sized(w, h))
    }

    fn solid(w: usize, h: usize, argb: u32) -> PixelBuffer {
        let mut b = PixelBuffer::new(w, h, PixelFormat::Argb);
        b.fill(argb);
        b
    }

    // ── registry ──────────────────────────────────────────────────────────

    #[test]
    fn disposed_ids_go_stale() {
        let mut s = surface(4, 4);
        let a = s.create_image(2, 2, PixelFormat::Argb);
        s.dispose_image(a).unwrap();
        let b = s.create_image(2, 2, PixelFormat::Argb);
        assert_ne!(a, b);
        assert!(s.image_buffer(a).is_none());
        assert_eq!(s.dispose_image(a).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(s.image(a, 0.0, 0.0).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    // ── background ────────────────────────────────────────────────────────

    #[test]
    fn background_color_and_image() {
        let mut s = surface(3, 2);
        s.background(200.0);
        assert!(s.pixels().pixels().iter().all(|&p| p | 0xFF00_0000 == 0xFFC8_C8C8));

        let img = s.add_image(solid(3, 2, 0xFF10_2030));
        s.background_image(img).unwrap();
        assert_eq!(s.pixels().get(2, 1), 0xFF10_2030);

        let wrong = s.add_image(solid(2, 2, 0xFF00_0000));
        assert_eq!(s.background_image(wrong).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    // ── image drawing ─────────────────────────────────────────────────────

    #[test]
    fn image_modes_place_and_scale() {
        let mut s = surface(10, 10);
        let img = s.add_image(solid(2, 2, 0xFFFF_FFFF));
        s.image(img, 1.0, 1.0).unwrap();
        assert_eq!(s.pixels().get(1, 1), 0xFFFF_FFFF);
        assert_eq!(s.pixels().get(3, 3), 0xFF00_0000);

        s.image_mode(PlacementMode::Center);
        s.image(img, 7.0, 7.0).unwrap();
        assert_eq!(s.pixels().get(6, 6), 0xFFFF_FFFF);
        assert_eq!(s.pixels().get(5, 5), 0xFF00_0000);

        s.image_mode(PlacementMode::Corners);
        s.image_sized(img, 0.0, 9.0, 4.0, 10.0).unwrap();
        assert_eq!(s.pixels().get(3, 9), 0xFFFF_FFFF);
    }

    #[test]
    fn tinted_copies_are_cached_per_tint_and_revision() {
        let mut s = surface(4, 4);
        let img = s.add_image(solid(2, 2, 0xFFFF_FFFF));
        s.tint(0xFFFF_0000u32);
        s.image(img, 0.0, 0.0).unwrap();
        s.image(img, 2.0, 2.0).unwrap();
        assert_eq!(s.tints().builds(), 1);
        assert_eq!(s.pixels().get(0, 0), 0xFFFF_0000);

        s.tint(0xFF00_FF00u32);
        s.image(img, 0.0, 0.0).unwrap();
        assert_eq!(s.tints().builds(), 2);

        s.image_buffer_mut(img).unwrap().set(0, 0, 0xFF00_0000);
        s.image(img, 0.0, 0.0).unwrap();
        assert_eq!(s.tints().builds(), 3);

        s.dispose_image(img).unwrap();
        assert!(s.tints().is_empty());
    }

    // ── blend and copy ────────────────────────────────────────────────────

    #[test]
    fn copy_between_and_within_images() {
        let mut s = surface(4, 4);
        let a = s.add_image(solid(2, 2, 0xFF11_2233));
        let b = s.create_image(4, 4, PixelFormat::Argb);
        s.copy_between(a, b, PixelRect::new(0, 0, 2, 2), PixelRect::new(2, 2, 2, 2)).unwrap();
        assert_eq!(s.image_buffer(b).unwrap().get(3, 3), 0xFF11_2233);
        assert_eq!(s.image_buffer(b).unwrap().get(0, 0), 0);

        s.copy_between(b, b, PixelRect::new(2, 2, 2, 2), PixelRect::new(0, 0, 2, 2)).unwrap();
        assert_eq!(s.image_buffer(b).unwrap().get(0, 0), 0xFF11_2233);
    }

    #[test]
    fn surface_copy_overlapping() {
        let mut s = surface(4, 1);
        for x in 0..4 {
            s.pixels_mut().set(x, 0, 0xFF00_0000 | x as u32);
        }
        s.copy(PixelRect::new(0, 0, 3, 1), PixelRect::new(1, 0, 3, 1));
        let row: Vec<u32> = (0..4).map(|x| s.pixels().get(x, 0) & 0xFF).collect();
        assert_eq!(row, [0, 0, 1, 2]);
    }

    // ── filters and persistence ───────────────────────────────────────────

    #[test]
    fn filter_surface_and_image() {
        let mut s = surface(2, 2);
        s.background(0xFF10_2030u32);
        s.filter(Filter::Invert);
        assert_eq!(s.pixels().get(0, 0), 0xFFEF_DFCF);

        let img = s.add_image(solid(2, 2, 0x80FF_FFFF));
        s.filter_image(img, Filter::Opaque).unwrap();
        assert_eq!(s.image_buffer(img).unwrap().get(1, 1) >> 24, 0xFF);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("easel-surface-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.tga");

        let mut s = surface(5, 3);
        s.background(0xFF44_5566u32);
        s.save(&path).unwrap();
        let id = s.load_image(&path).unwrap();
        assert_eq!(s.image_buffer(id).unwrap().get(4, 2), 0xFF44_5566);

        std::fs::remove_dir_all(&dir).ok();
    }
}
