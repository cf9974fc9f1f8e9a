//! Easel engine crate.
//!
//! CPU immediate-mode drawing: a [`Surface`] turns shape calls into vertex
//! streams, hands them to a [`Backend`], and composites, filters and saves
//! the resulting pixels.

pub mod error;
pub mod logging;

pub mod coords;
pub mod color;
pub mod pixels;
pub mod composite;
pub mod curve;
pub mod geometry;
pub mod style;
pub mod filter;
pub mod codec;
pub mod backend;
pub mod surface;

pub use backend::{Backend, Capability, RecordingBackend, SoftwareBackend};
pub use color::{ColorModel, ColorState, ResolvedColor};
pub use composite::BlendMode;
pub use error::{DrawError, DrawResult, ErrorKind};
pub use filter::Filter;
pub use geometry::{CloseMode, ShapeKind};
pub use pixels::{Canvas, PixelBuffer, PixelFormat};
pub use surface::{ImageId, Surface, SurfaceConfig};
