//! Cubic curve tessellation by forward differencing.

mod basis;
mod tessellator;

pub use tessellator::{
    CurveTessellator, ForwardSteps, bezier_point, bezier_tangent, curve_point, curve_tangent,
};
