use crate::coords::PixelRect;
use crate::pixels::{PixelBuffer, PixelFormat};

use super::mode::{BlendMode, blend_color};

const PRECISION_BITS: u32 = 15;
const ONE: u32 = 1 << PRECISION_BITS;
const FRACTION_MASK: u32 = ONE - 1;

/// How source texels are picked when the rectangles differ in size.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Sampling {
    Nearest,
    /// Four-texel weighted average, every channel including alpha.
    #[default]
    Bilinear,
}

/// Resampling blitter: maps a source rectangle onto a destination rectangle
/// and combines the pixels with a [`BlendMode`] in a single scanline pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Compositor {
    pub sampling: Sampling,
}

/// Destination-to-source mapping, already clipped on both sides.
#[derive(Debug, Copy, Clone, PartialEq)]
struct BlitPlan {
    /// Clipped destination rectangle.
    dst: PixelRect,
    /// Source position of the first destination pixel, 17.15 fixed point.
    src_x: u32,
    src_y: u32,
    /// Source step per destination pixel, 17.15 fixed point.
    step_x: u32,
    step_y: u32,
}

impl BlitPlan {
    fn new(
        src_size: (usize, usize),
        src_rect: PixelRect,
        dst_size: (usize, usize),
        dst_rect: PixelRect,
    ) -> Option<Self> {
        let src = src_rect.clip_to(src_size.0, src_size.1)?;
        let mut dst = dst_rect.normalized();
        if dst.is_empty() {
            return None;
        }

        // Entirely outside the destination.
        if dst.right() <= 0 || dst.bottom() <= 0 || dst.x >= dst_size.0 as i32 || dst.y >= dst_size.1 as i32 {
            return None;
        }

        let step_x = (src.w as f32 / dst.w as f32 * ONE as f32) as u32;
        let step_y = (src.h as f32 / dst.h as f32 * ONE as f32) as u32;
        let mut src_x = u64::from(src.x as u32) * u64::from(ONE);
        let mut src_y = u64::from(src.y as u32) * u64::from(ONE);

        // Leading destination pixels clipped off advance the source cursor.
        if dst.x < 0 {
            src_x += u64::from(dst.x.unsigned_abs()) * u64::from(step_x);
            dst.w += dst.x;
            dst.x = 0;
        }
        if dst.y < 0 {
            src_y += u64::from(dst.y.unsigned_abs()) * u64::from(step_y);
            dst.h += dst.y;
            dst.y = 0;
        }
        let src_x = u32::try_from(src_x).ok()?;
        let src_y = u32::try_from(src_y).ok()?;
        dst.w = dst.w.min(dst_size.0 as i32 - dst.x);
        dst.h = dst.h.min(dst_size.1 as i32 - dst.y);
        if dst.is_empty() {
            return None;
        }

        Some(Self { dst, src_x, src_y, step_x, step_y })
    }
}

/// Where texels are read from: a separate image, or the destination itself
/// when the regions are known not to overlap.
#[derive(Copy, Clone)]
enum Source<'a> {
    Image(&'a PixelBuffer),
    Destination,
}

impl Compositor {
    pub const fn new(sampling: Sampling) -> Self {
        Self { sampling }
    }

    pub const fn smooth(smooth: bool) -> Self {
        Self { sampling: if smooth { Sampling::Bilinear } else { Sampling::Nearest } }
    }

    /// Blends `src_rect` of `src` onto `dst_rect` of `dst`.
    ///
    /// The source is resampled when the rectangles differ in size. Zero-area
    /// rectangles are a no-op; both rectangles are clipped to their images.
    pub fn blend(
        &self,
        src: &PixelBuffer,
        src_rect: PixelRect,
        dst: &mut PixelBuffer,
        dst_rect: PixelRect,
        mode: BlendMode,
    ) {
        let Some(plan) = BlitPlan::new(
            (src.width(), src.height()),
            src_rect,
            (dst.width(), dst.height()),
            dst_rect,
        ) else {
            return;
        };
        self.run(Source::Image(src), (src.width(), src.height()), dst, plan, mode);
    }

    /// Blends one region of `buf` onto another region of the same buffer.
    ///
    /// Overlapping regions are handled by snapshotting the source first, so
    /// the result never reads pixels this call already wrote.
    pub fn blend_within(&self, buf: &mut PixelBuffer, src_rect: PixelRect, dst_rect: PixelRect, mode: BlendMode) {
        let Some(src_visible) = src_rect.clip_to(buf.width(), buf.height()) else { return };
        let dst_reach = dst_rect.normalized();

        if src_visible.overlaps(dst_reach) {
            let snapshot = buf.crop(src_visible);
            let local = PixelRect::of_size(snapshot.width(), snapshot.height());
            self.blend(&snapshot, local, buf, dst_rect, mode);
            return;
        }

        let size = (buf.width(), buf.height());
        let Some(plan) = BlitPlan::new(size, src_rect, size, dst_rect) else { return };
        self.run(Source::Destination, size, buf, plan, mode);
    }

    /// Returns a copy of `src` scaled to `width × height`.
    pub fn resized(&self, src: &PixelBuffer, width: usize, height: usize) -> PixelBuffer {
        let mut out = PixelBuffer::new(width, height, src.format());
        let bounds = out.bounds();
        self.blend(src, src.bounds(), &mut out, bounds, BlendMode::Replace);
        out.take_dirty();
        out
    }

    fn run(
        &self,
        src: Source<'_>,
        (src_w, src_h): (usize, usize),
        dst: &mut PixelBuffer,
        plan: BlitPlan,
        mode: BlendMode,
    ) {
        let dst_w = dst.width();
        let max_u = src_w - 1;
        let max_v = src_h - 1;

        let fetch = |dst: &PixelBuffer, i: usize| match src {
            Source::Image(img) => img.texel(i),
            Source::Destination => dst.texel(i),
        };

        let mut sy = plan.src_y;
        for row in 0..plan.dst.h as usize {
            let dst_row = (plan.dst.y as usize + row) * dst_w + plan.dst.x as usize;
            let v1 = ((sy >> PRECISION_BITS) as usize).min(max_v);
            let mut sx = plan.src_x;

            match self.sampling {
                Sampling::Nearest => {
                    let row_base = v1 * src_w;
                    for col in 0..plan.dst.w as usize {
                        let u = ((sx >> PRECISION_BITS) as usize).min(max_u);
                        let texel = fetch(&*dst, row_base + u);
                        let i = dst_row + col;
                        let out = blend_color(dst.texel(i), texel, mode);
                        dst.store(i, out);
                        sx += plan.step_x;
                    }
                }
                Sampling::Bilinear => {
                    let v2 = (v1 + 1).min(max_v);
                    let frac_v = sy & FRACTION_MASK;
                    let inv_v = ONE - frac_v;
                    for col in 0..plan.dst.w as usize {
                        let u1 = ((sx >> PRECISION_BITS) as usize).min(max_u);
                        let u2 = (u1 + 1).min(max_u);
                        let frac_u = sx & FRACTION_MASK;
                        let inv_u = ONE - frac_u;

                        let ul = (inv_u * inv_v) >> PRECISION_BITS;
                        let ll = inv_u - ul;
                        let ur = inv_v - ul;
                        let lr = ONE - ul - ll - ur;

                        let texel = bilinear(
                            [
                                fetch(&*dst, v1 * src_w + u1),
                                fetch(&*dst, v2 * src_w + u1),
                                fetch(&*dst, v1 * src_w + u2),
                                fetch(&*dst, v2 * src_w + u2),
                            ],
                            [ul, ll, ur, lr],
                        );
                        let i = dst_row + col;
                        let out = blend_color(dst.texel(i), texel, mode);
                        dst.store(i, out);
                        sx += plan.step_x;
                    }
                }
            }
            sy += plan.step_y;
        }

        dst.mark_dirty(plan.dst);
    }
}

/// Weighted sum of four texels; weights sum to `ONE`.
#[inline]
fn bilinear(texels: [u32; 4], weights: [u32; 4]) -> u32 {
    let mut out = 0;
    for shift in [24u32, 16, 8, 0] {
        let sum: u32 = texels
            .iter()
            .zip(weights)
            .map(|(t, w)| ((t >> shift) & 0xFF) * w)
            .sum();
        out |= ((sum >> PRECISION_BITS) & 0xFF) << shift;
    }
    out
}

impl PixelBuffer {
    /// Scaled copy through the compositor.
    pub fn resized(&self, width: usize, height: usize, sampling: Sampling) -> PixelBuffer {
        Compositor::new(sampling).resized(self, width, height)
    }

    /// Converts every pixel to another format (ARGB → RGB drops alpha, ALPHA
    /// keeps only the alpha byte).
    pub fn converted(&self, format: PixelFormat) -> PixelBuffer {
        let pixels = self
            .pixels()
            .iter()
            .map(|&p| format.from_argb(self.format().to_argb(p)))
            .collect();
        // Same dimensions, so the length check cannot fail.
        PixelBuffer::from_pixels(self.width(), self.height(), format, pixels)
            .unwrap_or_else(|_| PixelBuffer::new(self.width(), self.height(), format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: usize, h: usize) -> PixelBuffer {
        let pixels = (0..w * h)
            .map(|i| 0xFF00_0000 | ((i * 7 % 256) as u32) << 16 | ((i * 13 % 256) as u32) << 8 | (i % 256) as u32)
            .collect();
        PixelBuffer::from_pixels(w, h, PixelFormat::Argb, pixels).unwrap()
    }

    // ── REPLACE identity ──────────────────────────────────────────────────

    #[test]
    fn replace_copies_exactly_regardless_of_destination() {
        let src = gradient(8, 6);
        for sampling in [Sampling::Nearest, Sampling::Bilinear] {
            let mut dst = PixelBuffer::new(8, 6, PixelFormat::Argb);
            dst.fill(0x7F12_3456);
            let bounds = dst.bounds();
            Compositor::new(sampling).blend(&src, src.bounds(), &mut dst, bounds, BlendMode::Replace);
            assert_eq!(dst.pixels(), src.pixels(), "{sampling:?}");
        }
    }

    #[test]
    fn replace_into_sub_rectangle() {
        let src = gradient(4, 4);
        let mut dst = PixelBuffer::new(10, 10, PixelFormat::Argb);
        Compositor::default().blend(&src, src.bounds(), &mut dst, PixelRect::new(3, 2, 4, 4), BlendMode::Replace);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(dst.get(x + 3, y + 2), src.get(x, y));
            }
        }
        assert_eq!(dst.get(2, 2), 0);
        assert_eq!(dst.dirty(), Some(PixelRect::new(3, 2, 4, 4)));
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn zero_area_is_noop() {
        let src = gradient(4, 4);
        let mut dst = PixelBuffer::new(4, 4, PixelFormat::Argb);
        let before = dst.clone();
        let bounds = dst.bounds();
        Compositor::default().blend(&src, PixelRect::new(0, 0, 0, 4), &mut dst, bounds, BlendMode::Replace);
        Compositor::default().blend(&src, src.bounds(), &mut dst, PixelRect::new(1, 1, 3, 0), BlendMode::Replace);
        assert_eq!(dst, before);
    }

    #[test]
    fn negative_destination_offset_skips_source() {
        let src = gradient(4, 4);
        let mut dst = PixelBuffer::new(4, 4, PixelFormat::Argb);
        Compositor::new(Sampling::Nearest).blend(
            &src,
            src.bounds(),
            &mut dst,
            PixelRect::new(-2, -1, 4, 4),
            BlendMode::Replace,
        );
        assert_eq!(dst.get(0, 0), src.get(2, 1));
        assert_eq!(dst.get(1, 2), src.get(3, 3));
        assert_eq!(dst.get(2, 0), 0);
    }

    #[test]
    fn far_off_screen_destinations_are_noops() {
        let src = gradient(10, 10);
        let mut dst = PixelBuffer::new(8, 8, PixelFormat::Argb);
        let before = dst.clone();
        for sampling in [Sampling::Nearest, Sampling::Bilinear] {
            let c = Compositor::new(sampling);
            for rect in [
                PixelRect::new(-200_000, 0, 10, 10),
                PixelRect::new(0, -200_000, 10, 10),
                PixelRect::new(200_000, 0, 10, 10),
                PixelRect::new(0, 8, 10, 10),
            ] {
                c.blend(&src, src.bounds(), &mut dst, rect, BlendMode::Replace);
            }
        }
        assert_eq!(dst, before);
    }

    #[test]
    fn wide_destination_partly_on_screen() {
        let src = gradient(100_000, 1);
        let mut dst = PixelBuffer::new(4, 1, PixelFormat::Argb);
        Compositor::new(Sampling::Nearest).blend(
            &src,
            src.bounds(),
            &mut dst,
            PixelRect::new(-99_998, 0, 100_000, 1),
            BlendMode::Replace,
        );
        assert_eq!(dst.get(0, 0), src.get(99_998, 0));
        assert_eq!(dst.get(1, 0), src.get(99_999, 0));
        assert_eq!(dst.get(2, 0), 0);
    }

    #[test]
    fn oversized_destination_is_clipped() {
        let src = gradient(2, 2);
        let mut dst = PixelBuffer::new(3, 3, PixelFormat::Argb);
        Compositor::new(Sampling::Nearest).blend(&src, src.bounds(), &mut dst, PixelRect::new(1, 1, 20, 20), BlendMode::Replace);
        assert_eq!(dst.dirty(), Some(PixelRect::new(1, 1, 2, 2)));
    }

    // ── resampling ────────────────────────────────────────────────────────

    #[test]
    fn nearest_upscale_duplicates_texels() {
        let src = PixelBuffer::from_pixels(2, 1, PixelFormat::Argb, vec![0xFF00_0000, 0xFFFF_FFFF]).unwrap();
        let up = src.resized(4, 1, Sampling::Nearest);
        assert_eq!(up.pixels(), &[0xFF00_0000, 0xFF00_0000, 0xFFFF_FFFF, 0xFFFF_FFFF]);
    }

    #[test]
    fn bilinear_upscale_interpolates() {
        let src = PixelBuffer::from_pixels(2, 1, PixelFormat::Argb, vec![0xFF00_0000, 0xFFFF_FFFF]).unwrap();
        let up = src.resized(4, 1, Sampling::Bilinear);
        // Second pixel samples halfway between the two texels.
        let mid = up.get(1, 0) & 0xFF;
        assert!((120..=135).contains(&mid), "mid = {mid}");
        assert_eq!(up.get(0, 0), 0xFF00_0000);
    }

    #[test]
    fn alpha_source_reads_as_white_coverage() {
        let src = PixelBuffer::from_pixels(1, 1, PixelFormat::Alpha, vec![0xFF]).unwrap();
        let mut dst = PixelBuffer::new(1, 1, PixelFormat::Rgb);
        let bounds = dst.bounds();
        Compositor::default().blend(&src, src.bounds(), &mut dst, bounds, BlendMode::Blend);
        assert_eq!(dst.get(0, 0), 0xFFFF_FFFF);
    }

    // ── aliasing ──────────────────────────────────────────────────────────

    #[test]
    fn overlapping_self_copy_reads_original_pixels() {
        let mut buf = PixelBuffer::from_pixels(4, 1, PixelFormat::Argb, vec![1, 2, 3, 4]).unwrap();
        Compositor::new(Sampling::Nearest).blend_within(
            &mut buf,
            PixelRect::new(0, 0, 3, 1),
            PixelRect::new(1, 0, 3, 1),
            BlendMode::Replace,
        );
        assert_eq!(buf.pixels(), &[1, 1, 2, 3]);
    }

    #[test]
    fn disjoint_self_copy_in_place() {
        let mut buf = PixelBuffer::from_pixels(4, 1, PixelFormat::Argb, vec![1, 2, 3, 4]).unwrap();
        Compositor::new(Sampling::Nearest).blend_within(
            &mut buf,
            PixelRect::new(0, 0, 2, 1),
            PixelRect::new(2, 0, 2, 1),
            BlendMode::Replace,
        );
        assert_eq!(buf.pixels(), &[1, 2, 1, 2]);
    }

    #[test]
    fn converted_drops_or_keeps_alpha() {
        let src = PixelBuffer::from_pixels(1, 1, PixelFormat::Argb, vec![0x8012_3456]).unwrap();
        assert_eq!(src.converted(PixelFormat::Rgb).pixels(), &[0xFF12_3456]);
        assert_eq!(src.converted(PixelFormat::Alpha).pixels(), &[0x80]);
    }
}
