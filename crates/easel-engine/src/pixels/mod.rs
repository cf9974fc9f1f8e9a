//! Pixel storage.
//!
//! `PixelBuffer` is the in-memory framebuffer every other component reads
//! from or writes into; `Canvas` is the drawable-surface capability shared by
//! images and surfaces.

mod buffer;
mod canvas;
mod format;

pub use buffer::PixelBuffer;
pub use canvas::Canvas;
pub use format::PixelFormat;
