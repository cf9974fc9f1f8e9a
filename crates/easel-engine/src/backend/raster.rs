//! Coverage masks for the software backend.
//!
//! Every primitive of one shape marks a mask first; the mask is then blended
//! once, so overlapping pieces (stroke quads and their round joins, say) do
//! not darken translucent colors twice.

use crate::composite::{BlendMode, blend_color};
use crate::coords::{PixelRect, Vec2};
use crate::pixels::PixelBuffer;

const ROUND_SEGMENTS: usize = 16;

/// Boolean coverage over a clipped region of the target.
pub(super) struct Mask {
    rect: PixelRect,
    bits: Vec<bool>,
    any: bool,
}

impl Mask {
    /// Mask covering `points` grown by `pad`, clipped to the target.
    pub(super) fn around(points: impl Iterator<Item = Vec2>, pad: f32, width: usize, height: usize) -> Option<Self> {
        let (mut x0, mut y0, mut x1, mut y1) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for p in points {
            if !p.is_finite() {
                continue;
            }
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        if x0 > x1 {
            return None;
        }
        let left = (x0 - pad).floor().max(-1.0) as i32;
        let top = (y0 - pad).floor().max(-1.0) as i32;
        let right = (x1 + pad).ceil().min(width as f32 + 1.0) as i32 + 1;
        let bottom = (y1 + pad).ceil().min(height as f32 + 1.0) as i32 + 1;
        let rect = PixelRect::new(left, top, right - left, bottom - top).clip_to(width, height)?;
        Some(Self { rect, bits: vec![false; rect.area()], any: false })
    }

    #[inline]
    fn mark(&mut self, x: i32, y: i32) {
        if self.rect.contains(x, y) {
            let i = (y - self.rect.y) as usize * self.rect.w as usize + (x - self.rect.x) as usize;
            self.bits[i] = true;
            self.any = true;
        }
    }

    /// Even-odd scanline fill sampled at pixel centres.
    pub(super) fn fill_polygon(&mut self, poly: &[Vec2]) {
        if poly.len() < 3 {
            return;
        }
        let mut xs = Vec::new();
        for y in self.rect.y..self.rect.bottom() {
            let yc = y as f32 + 0.5;
            xs.clear();
            for (i, a) in poly.iter().enumerate() {
                let b = poly[(i + 1) % poly.len()];
                if (a.y <= yc && yc < b.y) || (b.y <= yc && yc < a.y) {
                    xs.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            xs.sort_by(f32::total_cmp);
            for span in xs.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(self.rect.x as f32) as i32;
                let end = (span[1] - 0.5).ceil().min(self.rect.right() as f32) as i32;
                for x in start..end {
                    self.mark(x, y);
                }
            }
        }
    }

    /// One-pixel line by DDA.
    pub(super) fn hairline(&mut self, a: Vec2, b: Vec2) {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        if !steps.is_finite() {
            return;
        }
        let n = steps as i32;
        for i in 0..=n {
            let t = i as f32 / steps;
            let x = (a.x + dx * t).floor() as i32;
            let y = (a.y + dy * t).floor() as i32;
            self.mark(x, y);
        }
    }

    /// Segment widened to a quad of thickness `weight`; `extend` lengthens
    /// both ends (projecting caps).
    pub(super) fn thick_segment(&mut self, a: Vec2, b: Vec2, weight: f32, extend: bool) {
        let d = b - a;
        let len = d.length();
        if len == 0.0 {
            return;
        }
        let dir = d * (1.0 / len);
        let half = weight / 2.0;
        let n = dir.perp() * half;
        let (a, b) = if extend { (a - dir * half, b + dir * half) } else { (a, b) };
        self.fill_polygon(&[a + n, b + n, b - n, a - n]);
    }

    pub(super) fn disc(&mut self, c: Vec2, diameter: f32) {
        let r = diameter / 2.0;
        let poly: Vec<Vec2> = (0..ROUND_SEGMENTS)
            .map(|i| {
                let a = i as f32 * std::f32::consts::TAU / ROUND_SEGMENTS as f32;
                Vec2::new(c.x + r * a.cos(), c.y + r * a.sin())
            })
            .collect();
        self.fill_polygon(&poly);
    }

    pub(super) fn square(&mut self, c: Vec2, side: f32) {
        let h = side / 2.0;
        self.fill_polygon(&[
            Vec2::new(c.x - h, c.y - h),
            Vec2::new(c.x + h, c.y - h),
            Vec2::new(c.x + h, c.y + h),
            Vec2::new(c.x - h, c.y + h),
        ]);
    }

    pub(super) fn point(&mut self, c: Vec2) {
        self.mark(c.x.floor() as i32, c.y.floor() as i32);
    }

    /// Blends `argb` into every covered pixel; returns the touched region.
    pub(super) fn blend_into(&self, target: &mut PixelBuffer, argb: u32, mode: BlendMode) -> Option<PixelRect> {
        if !self.any {
            return None;
        }
        let width = target.width();
        let mut bits = self.bits.iter();
        for y in self.rect.y..self.rect.bottom() {
            let row = y as usize * width;
            for x in self.rect.x..self.rect.right() {
                if bits.next().copied().unwrap_or(false) {
                    let i = row + x as usize;
                    let out = blend_color(target.texel(i), argb, mode);
                    target.store(i, out);
                }
            }
        }
        target.mark_dirty(self.rect);
        Some(self.rect)
    }

    #[cfg(test)]
    pub(super) fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(w: usize, h: usize) -> Mask {
        Mask::around([Vec2::zero(), Vec2::new(w as f32, h as f32)].into_iter(), 0.0, w, h).unwrap()
    }

    #[test]
    fn axis_aligned_square_covers_exact_pixels() {
        let mut m = mask(10, 10);
        m.fill_polygon(&[
            Vec2::new(2.0, 2.0),
            Vec2::new(6.0, 2.0),
            Vec2::new(6.0, 5.0),
            Vec2::new(2.0, 5.0),
        ]);
        assert_eq!(m.count(), 12);
    }

    #[test]
    fn even_odd_leaves_hole() {
        let mut m = mask(10, 10);
        // Outer square then inner square wound the same way as one path.
        m.fill_polygon(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(9.0, 0.0),
            Vec2::new(9.0, 9.0),
            Vec2::new(0.0, 9.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(6.0, 3.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(3.0, 6.0),
            Vec2::new(3.0, 3.0),
        ]);
        assert_eq!(m.count(), 81 - 9);
    }

    #[test]
    fn hairline_visits_each_column() {
        let mut m = mask(10, 10);
        m.hairline(Vec2::new(0.5, 0.5), Vec2::new(8.5, 4.5));
        assert_eq!(m.count(), 9);
    }

    #[test]
    fn blending_happens_once_per_pixel() {
        let mut target = PixelBuffer::new(4, 4, crate::pixels::PixelFormat::Rgb);
        let mut m = mask(4, 4);
        m.square(Vec2::new(2.0, 2.0), 2.0);
        m.square(Vec2::new(2.0, 2.0), 2.0);
        m.blend_into(&mut target, 0x80FF_FFFF, BlendMode::Blend).unwrap();
        let once = blend_color(0xFF00_0000, 0x80FF_FFFF, BlendMode::Blend);
        assert_eq!(target.get(1, 1), once);
        assert_eq!(target.get(0, 0), 0xFF00_0000);
    }
}
