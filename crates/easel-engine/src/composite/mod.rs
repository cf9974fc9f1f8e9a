//! Pixel combination: per-pixel blend formulas and the resampling blitter.

mod compositor;
mod mode;

pub use compositor::{Compositor, Sampling};
pub use mode::{BlendMode, blend_color};
