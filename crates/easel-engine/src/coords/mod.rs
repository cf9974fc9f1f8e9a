//! Geometry types shared by the tessellator, compositor and surface.
//!
//! Canonical space:
//! - pixels, origin top-left
//! - +X right, +Y down
//!
//! Float positions (`Vec2`, `Vec3`) feed tessellation; integer rectangles
//! (`PixelRect`) address pixel regions.

mod rect;
mod vec2;
mod vec3;

pub use rect::PixelRect;
pub use vec2::Vec2;
pub use vec3::Vec3;
