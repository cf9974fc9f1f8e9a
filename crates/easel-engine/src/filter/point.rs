//! Per-pixel filters. Each rewrites the buffer in place and marks it dirty.

use crate::pixels::{PixelBuffer, PixelFormat};

/// Integer luminance in `[0, 255]`.
#[inline]
pub(super) fn luminance(argb: u32) -> u32 {
    let r = (argb >> 16) & 0xFF;
    let g = (argb >> 8) & 0xFF;
    let b = argb & 0xFF;
    (77 * r + 151 * g + 28 * b) >> 8
}

#[inline]
fn gray_pixel(alpha: u32, l: u32) -> u32 {
    alpha << 24 | l << 16 | l << 8 | l
}

/// Replaces color with luminance. Alpha-only images become opaque gray with
/// `255 - coverage`.
pub(super) fn gray(buf: &mut PixelBuffer) {
    if buf.format() == PixelFormat::Alpha {
        for p in buf.raw_mut().iter_mut() {
            *p = gray_pixel(0xFF, 255 - (*p & 0xFF));
        }
        buf.set_format(PixelFormat::Rgb);
    } else {
        for p in buf.raw_mut().iter_mut() {
            *p = gray_pixel(*p >> 24, luminance(*p));
        }
    }
    buf.mark_all_dirty();
}

pub(super) fn invert(buf: &mut PixelBuffer) {
    let mask = if buf.format() == PixelFormat::Alpha { 0xFF } else { 0x00FF_FFFF };
    buf.raw_mut().iter_mut().for_each(|p| *p ^= mask);
    buf.mark_all_dirty();
}

pub(super) fn posterize(buf: &mut PixelBuffer, levels: u32) {
    let step = |c: u32| ((c * levels) >> 8) * 255 / (levels - 1);
    if buf.format() == PixelFormat::Alpha {
        buf.raw_mut().iter_mut().for_each(|p| *p = step(*p & 0xFF));
    } else {
        for p in buf.raw_mut().iter_mut() {
            let r = step((*p >> 16) & 0xFF);
            let g = step((*p >> 8) & 0xFF);
            let b = step(*p & 0xFF);
            *p = (*p & 0xFF00_0000) | r << 16 | g << 8 | b;
        }
    }
    buf.mark_all_dirty();
}

pub(super) fn threshold(buf: &mut PixelBuffer, level: f32) {
    let cutoff = (level * 255.0) as u32;
    if buf.format() == PixelFormat::Alpha {
        buf.raw_mut()
            .iter_mut()
            .for_each(|p| *p = if *p & 0xFF < cutoff { 0 } else { 0xFF });
    } else {
        for p in buf.raw_mut().iter_mut() {
            let max = ((*p >> 16) & 0xFF).max((*p >> 8) & 0xFF).max(*p & 0xFF);
            let rgb = if max < cutoff { 0 } else { 0x00FF_FFFF };
            *p = (*p & 0xFF00_0000) | rgb;
        }
    }
    buf.mark_all_dirty();
}

/// Forces full alpha and declares the buffer RGB. Alpha-only images become
/// gray levels of their coverage.
pub(super) fn opaque(buf: &mut PixelBuffer) {
    if buf.format() == PixelFormat::Alpha {
        for p in buf.raw_mut().iter_mut() {
            *p = gray_pixel(0xFF, *p & 0xFF);
        }
    } else {
        buf.raw_mut().iter_mut().for_each(|p| *p |= 0xFF00_0000);
    }
    buf.set_format(PixelFormat::Rgb);
    buf.mark_all_dirty();
}
