//! One-step luminance morphology over the 4-neighbourhood.

use crate::pixels::{PixelBuffer, PixelFormat};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum Morph {
    Erode,
    Dilate,
}

/// Writes the morphed image into `scratch`, then swaps it in.
pub(super) fn apply(buf: &mut PixelBuffer, op: Morph, scratch: &mut Vec<u32>) {
    let (w, h) = (buf.width(), buf.height());
    let alpha_only = buf.format() == PixelFormat::Alpha;
    let lum = |p: u32| {
        if alpha_only {
            (p & 0xFF) << 8
        } else {
            77 * ((p >> 16) & 0xFF) + 151 * ((p >> 8) & 0xFF) + 28 * (p & 0xFF)
        }
    };

    scratch.clear();
    scratch.reserve(w * h);
    let src = buf.pixels();
    for y in 0..h {
        for x in 0..w {
            let mut out = src[y * w + x];
            let mut best = lum(out);
            let neighbours = [
                (x.saturating_sub(1), y),
                ((x + 1).min(w - 1), y),
                (x, y.saturating_sub(1)),
                (x, (y + 1).min(h - 1)),
            ];
            for (nx, ny) in neighbours {
                let p = src[ny * w + nx];
                let l = lum(p);
                let better = match op {
                    Morph::Erode => l < best,
                    Morph::Dilate => l > best,
                };
                if better {
                    out = p;
                    best = l;
                }
            }
            scratch.push(out);
        }
    }

    std::mem::swap(buf.raw_mut(), scratch);
    buf.mark_all_dirty();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> PixelBuffer {
        let mut b = PixelBuffer::new(3, 3, PixelFormat::Rgb);
        b.set(1, 1, 0xFFFF_FFFF);
        b
    }

    #[test]
    fn dilate_grows_bright_cross() {
        let mut b = dot();
        let mut scratch = Vec::new();
        apply(&mut b, Morph::Dilate, &mut scratch);
        let white = |x, y| b.get(x, y) == 0xFFFF_FFFF;
        assert!(white(1, 1) && white(0, 1) && white(2, 1) && white(1, 0) && white(1, 2));
        assert!(!white(0, 0));
    }

    #[test]
    fn erode_removes_isolated_pixel() {
        let mut b = dot();
        let mut scratch = Vec::new();
        apply(&mut b, Morph::Erode, &mut scratch);
        assert!(b.pixels().iter().all(|&p| p == 0xFF00_0000));
        assert_eq!(scratch.len(), 9);
    }
}
