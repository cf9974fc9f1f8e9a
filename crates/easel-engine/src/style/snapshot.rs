use crate::color::{ColorState, ResolvedColor};
use crate::composite::BlendMode;
use crate::geometry::{CurveDetail, TextureMode, VertexPaint};

use super::modes::{PlacementMode, StrokeCap, StrokeJoin};

/// A color that can be switched off (`no_fill`, `no_stroke`, `no_tint`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Toggle {
    pub enabled: bool,
    pub color: ResolvedColor,
}

impl Toggle {
    pub const fn on(color: ResolvedColor) -> Self {
        Self { enabled: true, color }
    }

    pub const fn off(color: ResolvedColor) -> Self {
        Self { enabled: false, color }
    }

    /// Color when enabled.
    #[inline]
    pub fn active(&self) -> Option<ResolvedColor> {
        self.enabled.then_some(self.color)
    }
}

/// Sphere tessellation in longitude (`u`) and latitude (`v`) segments.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SphereDetail {
    pub u: u32,
    pub v: u32,
}

impl SphereDetail {
    pub const DEFAULT: SphereDetail = SphereDetail { u: 30, v: 30 };

    /// Clamps to the minimum usable resolution (`u ≥ 3`, `v ≥ 2`).
    pub fn new(u: u32, v: u32) -> Self {
        Self { u: u.max(3), v: v.max(2) }
    }
}

impl Default for SphereDetail {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Every mutable drawing-state field, copied by value on `push_style`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StyleSnapshot {
    pub image_mode: PlacementMode,
    pub rect_mode: PlacementMode,
    pub ellipse_mode: PlacementMode,
    pub blend_mode: BlendMode,
    pub color_state: ColorState,
    pub fill: Toggle,
    pub stroke: Toggle,
    pub tint: Toggle,
    pub stroke_weight: f32,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
    pub ambient: ResolvedColor,
    pub specular: ResolvedColor,
    pub emissive: ResolvedColor,
    pub shininess: f32,
    pub texture_mode: TextureMode,
    pub curve: CurveDetail,
    pub sphere_detail: SphereDetail,
}

impl Default for StyleSnapshot {
    fn default() -> Self {
        Self {
            image_mode: PlacementMode::Corner,
            rect_mode: PlacementMode::Corner,
            ellipse_mode: PlacementMode::Center,
            blend_mode: BlendMode::Blend,
            color_state: ColorState::default(),
            fill: Toggle::on(ResolvedColor::opaque_white()),
            stroke: Toggle::on(ResolvedColor::opaque_black()),
            tint: Toggle::off(ResolvedColor::opaque_white()),
            stroke_weight: 1.0,
            stroke_cap: StrokeCap::Round,
            stroke_join: StrokeJoin::Miter,
            ambient: ResolvedColor::from_argb(0xFFCC_CCCC),
            specular: ResolvedColor::from_argb(0xFF80_8080),
            emissive: ResolvedColor::opaque_black(),
            shininess: 1.0,
            texture_mode: TextureMode::Image,
            curve: CurveDetail::default(),
            sphere_detail: SphereDetail::DEFAULT,
        }
    }
}

impl StyleSnapshot {
    /// Per-vertex attributes for the current fill, stroke and material.
    pub fn vertex_paint(&self) -> VertexPaint {
        let rgb = |c: ResolvedColor| [c.rgba[0], c.rgba[1], c.rgba[2]];
        VertexPaint {
            fill: self.fill.color.rgba,
            stroke: self.stroke.color.rgba,
            stroke_weight: self.stroke_weight,
            ambient: rgb(self.ambient),
            specular: rgb(self.specular),
            emissive: rgb(self.emissive),
            shininess: self.shininess,
        }
    }
}
