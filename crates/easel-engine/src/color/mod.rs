//! Color resolution.
//!
//! Turns whatever the caller passed (packed int, gray level, three channels,
//! with or without alpha) into a canonical [`ResolvedColor`] under the active
//! [`ColorState`]. Nothing here fails: out-of-range input is clamped.

mod ops;
mod resolve;
mod state;

pub use ops::lerp_color;
pub use resolve::{ColorInput, ResolvedColor};
pub use state::{ColorModel, ColorState};

pub(crate) use resolve::{pack, unpack};
