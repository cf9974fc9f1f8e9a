/// Storage layout of a [`PixelBuffer`](super::PixelBuffer).
///
/// Every pixel is a `u32`; the format decides which bits are meaningful.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PixelFormat {
    /// `0xFFRRGGBB`; alpha is always forced to 0xFF.
    #[default]
    Rgb,
    /// `0xAARRGGBB`, straight alpha.
    Argb,
    /// Coverage only, in the low byte.
    Alpha,
}

impl PixelFormat {
    /// Channels touched by per-channel filters.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Argb => 4,
            PixelFormat::Alpha => 1,
        }
    }

    /// Converts a stored value into a full ARGB pixel.
    ///
    /// Alpha-only pixels read as white with the stored coverage as alpha.
    #[inline]
    pub const fn to_argb(self, stored: u32) -> u32 {
        match self {
            PixelFormat::Rgb => stored | 0xFF00_0000,
            PixelFormat::Argb => stored,
            PixelFormat::Alpha => (stored & 0xFF) << 24 | 0x00FF_FFFF,
        }
    }

    /// Converts a full ARGB pixel into this format's stored value.
    #[inline]
    pub const fn from_argb(self, argb: u32) -> u32 {
        match self {
            PixelFormat::Rgb => argb | 0xFF00_0000,
            PixelFormat::Argb => argb,
            PixelFormat::Alpha => argb >> 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_forces_opaque() {
        assert_eq!(PixelFormat::Rgb.from_argb(0x0012_3456), 0xFF12_3456);
        assert_eq!(PixelFormat::Rgb.to_argb(0x0012_3456), 0xFF12_3456);
    }

    #[test]
    fn alpha_reads_as_white_coverage() {
        assert_eq!(PixelFormat::Alpha.to_argb(0x80), 0x80FF_FFFF);
        assert_eq!(PixelFormat::Alpha.from_argb(0x80FF_FFFF), 0x80);
    }
}
