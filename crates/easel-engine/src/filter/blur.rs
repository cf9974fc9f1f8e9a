//! Separable blur with squared-triangle weights.

use crate::pixels::{PixelBuffer, PixelFormat};

pub(super) const MAX_KERNEL_RADIUS: usize = 248;

/// Kernel weights plus a `weight · value` lookup table per kernel slot.
#[derive(Debug, Clone)]
pub(super) struct BlurKernel {
    radius: usize,
    weights: Vec<u32>,
    table: Vec<[u32; 256]>,
}

impl BlurKernel {
    /// Kernel radius in pixels for a requested blur radius.
    pub(super) fn radius_for(radius: f32) -> usize {
        ((radius * 3.5) as i64).clamp(1, MAX_KERNEL_RADIUS as i64) as usize
    }

    pub(super) fn new(radius: usize) -> Self {
        let size = 2 * radius + 1;
        let mut weights = vec![0u32; size];
        for offset in 1..radius {
            let w = ((radius - offset) * (radius - offset)) as u32;
            weights[radius + offset] = w;
            weights[radius - offset] = w;
        }
        weights[radius] = (radius * radius) as u32;
        let table = weights
            .iter()
            .map(|&w| std::array::from_fn(|v| w * v as u32))
            .collect();
        Self { radius, weights, table }
    }

    #[inline]
    pub(super) fn radius(&self) -> usize {
        self.radius
    }

    /// Convolves one line of `len` samples read through `at`. Taps falling
    /// outside the line are skipped and the result is renormalised by the
    /// weights actually used.
    fn line<const N: usize>(&self, src: &[[u8; N]], dst: &mut [[u8; N]], len: usize, at: impl Fn(usize) -> usize) {
        let r = self.radius as isize;
        for k in 0..len {
            let first = k as isize - r;
            let skip = (-first).max(0) as usize;
            let mut read = first.max(0) as usize;

            let mut acc = [0u64; N];
            let mut sum = 0u64;
            for slot in skip..self.weights.len() {
                if read >= len {
                    break;
                }
                let c = src[at(read)];
                let row = &self.table[slot];
                for ch in 0..N {
                    acc[ch] += u64::from(row[c[ch] as usize]);
                }
                sum += u64::from(self.weights[slot]);
                read += 1;
            }
            dst[at(k)] = acc.map(|a| (a / sum.max(1)) as u8);
        }
    }

    /// Horizontal then vertical pass over `N`-channel samples.
    fn convolve<const N: usize>(&self, samples: &mut Vec<[u8; N]>, width: usize, height: usize) {
        let mut tmp = vec![[0u8; N]; samples.len()];
        for y in 0..height {
            self.line(samples, &mut tmp, width, |x| y * width + x);
        }
        for x in 0..width {
            self.line(&tmp, samples, height, |y| y * width + x);
        }
    }

    pub(super) fn apply(&self, buf: &mut PixelBuffer) {
        let (w, h) = (buf.width(), buf.height());
        match buf.format() {
            PixelFormat::Alpha => self.apply_channels::<1>(buf, w, h, |p| [p as u8], |[a]| u32::from(a)),
            PixelFormat::Rgb => self.apply_channels::<3>(
                buf,
                w,
                h,
                |p| [(p >> 16) as u8, (p >> 8) as u8, p as u8],
                |[r, g, b]| 0xFF00_0000 | u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b),
            ),
            PixelFormat::Argb => self.apply_channels::<4>(
                buf,
                w,
                h,
                |p| p.to_be_bytes(),
                u32::from_be_bytes,
            ),
        }
        buf.mark_all_dirty();
    }

    fn apply_channels<const N: usize>(
        &self,
        buf: &mut PixelBuffer,
        width: usize,
        height: usize,
        split: impl Fn(u32) -> [u8; N],
        join: impl Fn([u8; N]) -> u32,
    ) {
        let mut samples: Vec<[u8; N]> = buf.pixels().iter().map(|&p| split(p)).collect();
        self.convolve(&mut samples, width, height);
        for (p, s) in buf.raw_mut().iter_mut().zip(samples) {
            *p = join(s);
        }
    }
}
