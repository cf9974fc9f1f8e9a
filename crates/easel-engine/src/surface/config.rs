use crate::pixels::PixelFormat;
use crate::style::DEFAULT_DEPTH;

/// Surface construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    /// Bilinear resampling for scaled image draws and copies.
    pub smooth: bool,
    /// `push_style` nesting limit.
    pub style_depth: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            format: PixelFormat::Rgb,
            smooth: true,
            style_depth: DEFAULT_DEPTH,
        }
    }
}

impl SurfaceConfig {
    pub fn sized(width: usize, height: usize) -> Self {
        Self { width, height, ..Self::default() }
    }
}
