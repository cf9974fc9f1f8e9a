use crate::pixels::PixelBuffer;

use super::blur::BlurKernel;
use super::kind::Filter;
use super::morph::{self, Morph};
use super::point;

/// Applies raster filters and keeps their reusable state: the blur kernel
/// for the last radius and a scratch buffer for morphology.
///
/// One bank per surface; nothing is shared between banks.
#[derive(Debug, Default, Clone)]
pub struct RasterFilterBank {
    blur: Option<BlurKernel>,
    scratch: Vec<u32>,
    kernel_builds: u64,
}

impl RasterFilterBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times the blur kernel has been rebuilt.
    pub fn kernel_builds(&self) -> u64 {
        self.kernel_builds
    }

    /// Runs `filter` over the whole buffer in place.
    pub fn apply(&mut self, buf: &mut PixelBuffer, filter: Filter) {
        if buf.width() == 0 || buf.height() == 0 {
            return;
        }
        match filter {
            Filter::Gray => point::gray(buf),
            Filter::Invert => point::invert(buf),
            Filter::Posterize { levels } => point::posterize(buf, levels),
            Filter::Threshold { level } => point::threshold(buf, level),
            Filter::Opaque => point::opaque(buf),
            Filter::Blur { radius } => self.kernel(BlurKernel::radius_for(radius)).apply(buf),
            Filter::Erode => morph::apply(buf, Morph::Erode, &mut self.scratch),
            Filter::Dilate => morph::apply(buf, Morph::Dilate, &mut self.scratch),
        }
    }

    fn kernel(&mut self, radius: usize) -> &BlurKernel {
        if self.blur.as_ref().is_none_or(|k| k.radius() != radius) {
            log::debug!("blur kernel rebuilt for radius {radius}");
            self.kernel_builds += 1;
            self.blur = Some(BlurKernel::new(radius));
        }
        self.blur.get_or_insert_with(|| BlurKernel::new(radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterKind;
    use crate::pixels::PixelFormat;

    fn sample() -> PixelBuffer {
        let pixels = (0..64u32).map(|i| (i * 4) << 24 | (i * 3) << 16 | (255 - i) << 8 | i * 2).collect();
        PixelBuffer::from_pixels(8, 8, PixelFormat::Argb, pixels).unwrap()
    }

    // ── algebraic properties ──────────────────────────────────────────────

    #[test]
    fn invert_twice_restores() {
        let mut bank = RasterFilterBank::new();
        let original = sample();
        let mut b = original.clone();
        bank.apply(&mut b, Filter::Invert);
        bank.apply(&mut b, Filter::Invert);
        assert_eq!(b.pixels(), original.pixels());
    }

    #[test]
    fn opaque_twice_equals_once() {
        let mut bank = RasterFilterBank::new();
        let mut once = sample();
        bank.apply(&mut once, Filter::Opaque);
        let mut twice = once.clone();
        bank.apply(&mut twice, Filter::Opaque);
        assert_eq!(once.pixels(), twice.pixels());
        assert_eq!(twice.format(), PixelFormat::Rgb);
    }

    // ── caching ───────────────────────────────────────────────────────────

    #[test]
    fn blur_kernel_rebuilt_only_on_radius_change() {
        let mut bank = RasterFilterBank::new();
        let mut b = sample();
        bank.apply(&mut b, Filter::Blur { radius: 1.0 });
        bank.apply(&mut b, Filter::Blur { radius: 1.0 });
        assert_eq!(bank.kernel_builds(), 1);
        bank.apply(&mut b, Filter::Blur { radius: 2.0 });
        assert_eq!(bank.kernel_builds(), 2);
        // Same kernel radius after the 3.5 scale and truncation.
        bank.apply(&mut b, Filter::Blur { radius: 2.1 });
        assert_eq!(bank.kernel_builds(), 2);
    }

    #[test]
    fn untyped_entry_point_dispatches() {
        let mut bank = RasterFilterBank::new();
        let mut b = sample();
        bank.apply(&mut b, Filter::from_kind(FilterKind::Threshold, None).unwrap());
        assert!(b.pixels().iter().all(|&p| p & 0x00FF_FFFF == 0 || p & 0x00FF_FFFF == 0x00FF_FFFF));
    }

    #[test]
    fn marks_buffer_dirty() {
        let mut bank = RasterFilterBank::new();
        let mut b = sample();
        bank.apply(&mut b, Filter::Erode);
        assert_eq!(b.dirty(), Some(b.bounds()));
    }
}
