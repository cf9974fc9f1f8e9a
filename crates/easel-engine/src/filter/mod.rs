//! In-place raster filters.

mod bank;
mod blur;
mod kind;
mod morph;
mod point;

pub use bank::RasterFilterBank;
pub use kind::{Filter, FilterKind};
