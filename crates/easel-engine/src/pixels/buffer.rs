use crate::coords::PixelRect;
use crate::error::{DrawError, DrawResult};

use super::PixelFormat;

/// Row-major in-memory framebuffer.
///
/// Invariants:
/// - `pixels.len() == width * height`
/// - RGB buffers carry alpha 0xFF in every pixel
/// - the dirty rectangle, when present, lies inside the image
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    format: PixelFormat,
    pixels: Vec<u32>,
    dirty: Option<PixelRect>,
    /// Bumped on every marked modification; caches keyed on image content compare it.
    revision: u64,
}

impl PixelBuffer {
    /// Creates a cleared buffer: opaque black for RGB, fully transparent otherwise.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let clear = format.from_argb(0);
        Self {
            width,
            height,
            format,
            pixels: vec![clear; width * height],
            dirty: None,
            revision: 0,
        }
    }

    /// Wraps existing pixel data. RGB data has its alpha forced to 0xFF.
    pub fn from_pixels(
        width: usize,
        height: usize,
        format: PixelFormat,
        mut pixels: Vec<u32>,
    ) -> DrawResult<Self> {
        if pixels.len() != width * height {
            return Err(DrawError::invalid_argument(format!(
                "pixel data has {} entries, a {width}x{height} image needs {}",
                pixels.len(),
                width * height
            )));
        }
        if format == PixelFormat::Rgb {
            pixels.iter_mut().for_each(|p| *p |= 0xFF00_0000);
        }
        Ok(Self { width, height, format, pixels, dirty: None, revision: 0 })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn bounds(&self) -> PixelRect {
        PixelRect::of_size(self.width, self.height)
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Stored pixel values in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Mutable pixel access. The whole image is marked dirty.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        self.mark_all_dirty();
        &mut self.pixels
    }

    /// Pixel storage as native-endian bytes, for hosts uploading the frame.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Raw access without dirty tracking; callers mark what they touched.
    #[inline]
    pub(crate) fn raw_mut(&mut self) -> &mut Vec<u32> {
        &mut self.pixels
    }

    /// Changes the declared format without touching pixel data.
    ///
    /// Used by filters that promote alpha or gray data to opaque RGB after
    /// rewriting every pixel.
    pub(crate) fn set_format(&mut self, format: PixelFormat) {
        self.format = format;
    }

    // ── pixel access ──────────────────────────────────────────────────────

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /// ARGB value at `(x, y)`; transparent black outside the image.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u32 {
        self.index(x, y).map_or(0, |i| self.format.to_argb(self.pixels[i]))
    }

    /// ARGB value by linear index; the caller guarantees bounds.
    #[inline]
    pub(crate) fn texel(&self, i: usize) -> u32 {
        self.format.to_argb(self.pixels[i])
    }

    /// Stores an ARGB value by linear index, converting to the buffer format.
    #[inline]
    pub(crate) fn store(&mut self, i: usize, argb: u32) {
        self.pixels[i] = self.format.from_argb(argb);
    }

    /// Writes one ARGB pixel; writes outside the image are ignored.
    pub fn set(&mut self, x: i32, y: i32, argb: u32) {
        if let Some(i) = self.index(x, y) {
            self.store(i, argb);
            self.mark_dirty(PixelRect::new(x, y, 1, 1));
        }
    }

    /// Fills every pixel with `argb`.
    pub fn fill(&mut self, argb: u32) {
        let v = self.format.from_argb(argb);
        self.pixels.iter_mut().for_each(|p| *p = v);
        self.mark_all_dirty();
    }

    /// Copies a region into a new buffer of the same format.
    ///
    /// Parts of `rect` outside the image come back transparent (or opaque
    /// black for RGB).
    pub fn crop(&self, rect: PixelRect) -> PixelBuffer {
        let rect = rect.normalized();
        let mut out = PixelBuffer::new(rect.w.max(0) as usize, rect.h.max(0) as usize, self.format);
        let Some(visible) = rect.clip_to(self.width, self.height) else { return out };

        for y in visible.y..visible.bottom() {
            let src_row = y as usize * self.width;
            let dst_row = (y - rect.y) as usize * out.width;
            let x0 = visible.x as usize;
            let x1 = visible.right() as usize;
            let dx = (visible.x - rect.x) as usize;
            out.pixels[dst_row + dx..dst_row + dx + (x1 - x0)]
                .copy_from_slice(&self.pixels[src_row + x0..src_row + x1]);
        }
        out
    }

    /// Replaces the alpha channel with the low byte of `mask` (blue for RGB
    /// masks, coverage for alpha masks). The buffer becomes ARGB.
    pub fn apply_mask(&mut self, mask: &PixelBuffer) -> DrawResult<()> {
        if mask.width != self.width || mask.height != self.height {
            return Err(DrawError::invalid_argument(format!(
                "mask is {}x{} but the image is {}x{}",
                mask.width, mask.height, self.width, self.height
            )));
        }
        let format = self.format;
        for (p, m) in self.pixels.iter_mut().zip(&mask.pixels) {
            *p = (m & 0xFF) << 24 | (format.to_argb(*p) & 0x00FF_FFFF);
        }
        self.format = PixelFormat::Argb;
        self.mark_all_dirty();
        Ok(())
    }

    // ── dirty tracking ────────────────────────────────────────────────────

    /// Records that `rect` changed. Clipped to the image; empty rects are ignored.
    pub fn mark_dirty(&mut self, rect: PixelRect) {
        let Some(rect) = rect.clip_to(self.width, self.height) else { return };
        self.dirty = Some(match self.dirty {
            Some(d) => d.union(rect),
            None => rect,
        });
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn mark_all_dirty(&mut self) {
        self.mark_dirty(self.bounds());
    }

    /// Region changed since the last [`take_dirty`](Self::take_dirty).
    #[inline]
    pub fn dirty(&self) -> Option<PixelRect> {
        self.dirty
    }

    /// Returns and clears the dirty region; the presentation host calls this once per frame.
    pub fn take_dirty(&mut self) -> Option<PixelRect> {
        self.dirty.take()
    }

    // ── `image` crate interop ─────────────────────────────────────────────

    /// Converts to straight-alpha RGBA8.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut raw = Vec::with_capacity(self.pixels.len() * 4);
        for &p in &self.pixels {
            let argb = self.format.to_argb(p);
            raw.extend_from_slice(&[(argb >> 16) as u8, (argb >> 8) as u8, argb as u8, (argb >> 24) as u8]);
        }
        // Length is width * height * 4 by construction.
        image::RgbaImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| image::RgbaImage::new(self.width as u32, self.height as u32))
    }

    /// Builds a buffer from any decoded image: ARGB when the source has an
    /// alpha channel, RGB otherwise.
    pub fn from_dynamic_image(img: &image::DynamicImage) -> Self {
        let format = if img.color().has_alpha() { PixelFormat::Argb } else { PixelFormat::Rgb };
        let rgba = img.to_rgba8();
        let pixels = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                format.from_argb((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
            })
            .collect();
        Self {
            width: rgba.width() as usize,
            height: rgba.height() as usize,
            format,
            pixels,
            dirty: None,
            revision: 0,
        }
    }
}
