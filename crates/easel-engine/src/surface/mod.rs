//! The drawing facade.
//!
//! A [`Surface`] owns one framebuffer and all drawing state. Primitive calls
//! become shape sessions on its vertex buffer; finished shapes go to the
//! [`Backend`](crate::backend::Backend) chosen at construction.

mod config;
mod images;
mod pixel_ops;
mod primitives;
mod sphere;
mod warnings;

pub use config::SurfaceConfig;
pub use images::{ImageArena, ImageId, TintCache};
pub use sphere::{SphereCache, SphereTable};
pub use warnings::{LogSink, WarningSink, Warnings};

use crate::backend::{Backend, Capability, ShapeRef, SoftwareBackend};
use crate::color::{ColorInput, ColorModel, ColorState, ResolvedColor};
use crate::composite::{BlendMode, Compositor};
use crate::coords::{PixelRect, Vec3};
use crate::curve::CurveTessellator;
use crate::error::{DrawError, DrawResult};
use crate::filter::RasterFilterBank;
use crate::geometry::{CloseMode, FinishedShape, ShapeBuilder, ShapeKind, TextureMode};
use crate::pixels::{Canvas, PixelBuffer};
use crate::style::{PlacementMode, SphereDetail, StrokeCap, StrokeJoin, StyleSnapshot, StyleStack, Toggle};

pub struct Surface {
    pixels: PixelBuffer,
    shape: ShapeBuilder,
    style: StyleSnapshot,
    stack: StyleStack,
    curves: CurveTessellator,
    filters: RasterFilterBank,
    images: ImageArena,
    tints: TintCache,
    spheres: SphereCache,
    warnings: Warnings,
    backend: Box<dyn Backend>,
    compositor: Compositor,
    texture: Option<ImageId>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("format", &self.pixels.format())
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl Surface {
    /// Surface drawing through the CPU rasterizer.
    pub fn new(config: SurfaceConfig) -> Self {
        Self::with_backend(config, Box::new(SoftwareBackend::new()))
    }

    pub fn with_backend(config: SurfaceConfig, backend: Box<dyn Backend>) -> Self {
        log::debug!(
            "surface {}x{} {:?} on '{}' backend",
            config.width,
            config.height,
            config.format,
            backend.name()
        );
        Self {
            pixels: PixelBuffer::new(config.width, config.height, config.format),
            shape: ShapeBuilder::new(),
            style: StyleSnapshot::default(),
            stack: StyleStack::new(config.style_depth),
            curves: CurveTessellator::new(),
            filters: RasterFilterBank::new(),
            images: ImageArena::new(),
            tints: TintCache::new(),
            spheres: SphereCache::default(),
            warnings: Warnings::default(),
            backend,
            compositor: Compositor::smooth(config.smooth),
            texture: None,
        }
    }

    /// Replaces the warning destination (default: `log::warn!`).
    pub fn with_warning_sink(mut self, sink: Box<dyn WarningSink>) -> Self {
        self.warnings = Warnings::new(sink);
        self
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut PixelBuffer {
        &mut self.pixels
    }

    /// Region changed since the previous call; the presentation host polls this.
    pub fn take_dirty(&mut self) -> Option<PixelRect> {
        self.pixels.take_dirty()
    }

    pub fn style(&self) -> &StyleSnapshot {
        &self.style
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    pub fn curves(&self) -> &CurveTessellator {
        &self.curves
    }

    pub fn filters(&self) -> &RasterFilterBank {
        &self.filters
    }

    pub fn spheres(&self) -> &SphereCache {
        &self.spheres
    }

    pub fn tints(&self) -> &TintCache {
        &self.tints
    }

    pub fn smooth(&mut self, smooth: bool) {
        self.compositor = Compositor::smooth(smooth);
    }

    /// Reports an operation the backend cannot perform; each message once.
    pub(crate) fn unsupported(&mut self, what: &str, capability: Capability) -> bool {
        if self.backend.supports(capability) {
            return false;
        }
        let err = DrawError::Unsupported(format!("{what} on the '{}' backend", self.backend.name()));
        self.warnings.report(err.to_string());
        true
    }

    // ── color ─────────────────────────────────────────────────────────────

    /// Resolves a color under the current color mode.
    pub fn color(&self, input: impl Into<ColorInput>) -> ResolvedColor {
        self.style.color_state.resolve(input)
    }

    /// Sets the color model with one maximum for every channel.
    pub fn color_mode(&mut self, model: ColorModel, max: f32) -> DrawResult<()> {
        self.set_color_state(ColorState::uniform(model, max)?);
        Ok(())
    }

    /// Sets the color model with per-channel maxima.
    pub fn color_mode_channels(&mut self, model: ColorModel, x: f32, y: f32, z: f32, a: f32) -> DrawResult<()> {
        self.set_color_state(ColorState::new(model, x, y, z, a)?);
        Ok(())
    }

    pub fn set_color_state(&mut self, state: ColorState) {
        self.style.color_state = state;
    }

    // ── style setters ─────────────────────────────────────────────────────

    pub fn fill(&mut self, color: impl Into<ColorInput>) {
        self.style.fill = Toggle::on(self.color(color));
    }

    pub fn no_fill(&mut self) {
        self.style.fill.enabled = false;
    }

    pub fn stroke(&mut self, color: impl Into<ColorInput>) {
        self.style.stroke = Toggle::on(self.color(color));
    }

    pub fn no_stroke(&mut self) {
        self.style.stroke.enabled = false;
    }

    pub fn tint(&mut self, color: impl Into<ColorInput>) {
        self.style.tint = Toggle::on(self.color(color));
    }

    pub fn no_tint(&mut self) {
        self.style.tint.enabled = false;
    }

    /// Negative or non-finite weights become zero.
    pub fn stroke_weight(&mut self, weight: f32) {
        self.style.stroke_weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
    }

    pub fn stroke_cap(&mut self, cap: StrokeCap) {
        self.style.stroke_cap = cap;
    }

    pub fn stroke_join(&mut self, join: StrokeJoin) {
        self.style.stroke_join = join;
    }

    pub fn ambient(&mut self, color: impl Into<ColorInput>) {
        self.style.ambient = self.color(color);
    }

    pub fn specular(&mut self, color: impl Into<ColorInput>) {
        self.style.specular = self.color(color);
    }

    pub fn emissive(&mut self, color: impl Into<ColorInput>) {
        self.style.emissive = self.color(color);
    }

    pub fn shininess(&mut self, shine: f32) {
        self.style.shininess = shine;
    }

    pub fn rect_mode(&mut self, mode: PlacementMode) {
        self.style.rect_mode = mode;
    }

    pub fn ellipse_mode(&mut self, mode: PlacementMode) {
        self.style.ellipse_mode = mode;
    }

    pub fn image_mode(&mut self, mode: PlacementMode) {
        self.style.image_mode = mode;
    }

    pub fn blend_mode(&mut self, mode: BlendMode) {
        self.style.blend_mode = mode;
    }

    pub fn texture_mode(&mut self, mode: TextureMode) {
        self.style.texture_mode = mode;
        self.shape.texture_mode(mode);
    }

    pub fn bezier_detail(&mut self, steps: u32) -> DrawResult<()> {
        self.style.curve.bezier_steps = check_detail(steps)?;
        Ok(())
    }

    pub fn curve_detail(&mut self, steps: u32) -> DrawResult<()> {
        self.style.curve.curve_steps = check_detail(steps)?;
        Ok(())
    }

    pub fn curve_tightness(&mut self, tightness: f32) -> DrawResult<()> {
        if !tightness.is_finite() {
            return Err(DrawError::invalid_argument(format!("curve tightness {tightness} is not finite")));
        }
        self.style.curve.tightness = tightness;
        Ok(())
    }

    /// Sphere resolution; raised to at least 3 × 2.
    pub fn sphere_detail(&mut self, u: u32, v: u32) {
        self.style.sphere_detail = SphereDetail::new(u, v);
    }

    // ── style stack ───────────────────────────────────────────────────────

    pub fn push_style(&mut self) -> DrawResult<()> {
        self.stack.push(self.style)
    }

    /// Restores the most recent pushed style through the setters.
    pub fn pop_style(&mut self) -> DrawResult<()> {
        let saved = self.stack.pop()?;
        self.restore(&saved)
    }

    fn restore(&mut self, s: &StyleSnapshot) -> DrawResult<()> {
        self.image_mode(s.image_mode);
        self.rect_mode(s.rect_mode);
        self.ellipse_mode(s.ellipse_mode);
        self.blend_mode(s.blend_mode);

        // Float channels re-enter under unit RGB so no value reads as packed.
        self.set_color_state(ColorState::unit_rgb());
        let [r, g, b, a] = s.fill.color.rgba;
        self.fill((r, g, b, a));
        if !s.fill.enabled {
            self.no_fill();
        }
        let [r, g, b, a] = s.stroke.color.rgba;
        self.stroke((r, g, b, a));
        if !s.stroke.enabled {
            self.no_stroke();
        }
        let [r, g, b, a] = s.tint.color.rgba;
        self.tint((r, g, b, a));
        if !s.tint.enabled {
            self.no_tint();
        }

        let [r, g, b, a] = s.ambient.rgba;
        self.ambient((r, g, b, a));
        let [r, g, b, a] = s.specular.rgba;
        self.specular((r, g, b, a));
        let [r, g, b, a] = s.emissive.rgba;
        self.emissive((r, g, b, a));
        self.shininess(s.shininess);

        self.set_color_state(s.color_state);

        self.stroke_weight(s.stroke_weight);
        self.stroke_cap(s.stroke_cap);
        self.stroke_join(s.stroke_join);
        self.texture_mode(s.texture_mode);
        self.bezier_detail(s.curve.bezier_steps)?;
        self.curve_detail(s.curve.curve_steps)?;
        self.curve_tightness(s.curve.tightness)?;
        self.sphere_detail(s.sphere_detail.u, s.sphere_detail.v);
        Ok(())
    }

    // ── shape sessions ────────────────────────────────────────────────────

    pub fn begin_shape(&mut self, kind: ShapeKind) -> DrawResult<()> {
        self.shape.begin_shape(kind)
    }

    /// Closes the open session and draws it.
    pub fn end_shape(&mut self, close: CloseMode) -> DrawResult<()> {
        let done = self.shape.end_shape(close)?;
        self.dispatch(done, self.style.fill.enabled, self.style.stroke.enabled)
    }

    pub fn vertex(&mut self, x: f32, y: f32) -> DrawResult<()> {
        self.vertex3(x, y, 0.0)
    }

    pub fn vertex3(&mut self, x: f32, y: f32, z: f32) -> DrawResult<()> {
        let paint = self.style.vertex_paint();
        self.shape.vertex(Vec3::new(x, y, z), &paint).map(drop)
    }

    /// Textured vertex; `u`/`v` follow the texture mode.
    pub fn vertex_uv(&mut self, x: f32, y: f32, u: f32, v: f32) -> DrawResult<()> {
        let paint = self.style.vertex_paint();
        self.shape.vertex_uv(Vec3::from_2d(x, y), u, v, &paint).map(drop)
    }

    pub fn normal(&mut self, x: f32, y: f32, z: f32) {
        self.shape.normal(Vec3::new(x, y, z));
    }

    pub fn edge(&mut self, edge: bool) {
        self.shape.edge(edge);
    }

    /// Binds a registered image as the texture for following vertices.
    pub fn texture(&mut self, id: ImageId) -> DrawResult<()> {
        let image = self.images.get(id).ok_or_else(|| unknown_image(id))?;
        self.shape.set_texture(Some((image.width(), image.height())));
        self.texture = Some(id);
        Ok(())
    }

    pub fn no_texture(&mut self) {
        self.shape.set_texture(None);
        self.texture = None;
    }

    pub fn bezier_vertex(&mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) -> DrawResult<()> {
        let paint = self.style.vertex_paint();
        self.shape.bezier_vertex(
            Vec3::from_2d(cx1, cy1),
            Vec3::from_2d(cx2, cy2),
            Vec3::from_2d(x, y),
            &mut self.curves,
            self.style.curve,
            &paint,
        )
    }

    pub fn quadratic_vertex(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> DrawResult<()> {
        let paint = self.style.vertex_paint();
        self.shape.quadratic_vertex(
            Vec3::from_2d(cx, cy),
            Vec3::from_2d(x, y),
            &mut self.curves,
            self.style.curve,
            &paint,
        )
    }

    pub fn curve_vertex(&mut self, x: f32, y: f32) -> DrawResult<()> {
        let paint = self.style.vertex_paint();
        self.shape.curve_vertex(Vec3::from_2d(x, y), &mut self.curves, self.style.curve, &paint)
    }

    /// Hands the just-finished session to the backend.
    fn dispatch(&mut self, done: FinishedShape, fill: bool, stroke: bool) -> DrawResult<()> {
        if done.textured && self.unsupported("textured shapes", Capability::Texture) {
            return Ok(());
        }
        let texture = match (done.textured, self.texture) {
            (true, Some(id)) => self.images.get(id),
            _ => None,
        };
        let shape = ShapeRef {
            kind: done.kind,
            close: done.close,
            vertices: self.shape.vertices(),
            fill,
            stroke,
            stroke_cap: self.style.stroke_cap,
            stroke_join: self.style.stroke_join,
            blend_mode: self.style.blend_mode,
            texture,
        };
        log::trace!(
            "{:?} shape, {} vertices -> '{}'",
            shape.kind,
            shape.vertices.len(),
            self.backend.name()
        );
        self.backend.draw(&mut self.pixels, &shape)
    }
}

fn check_detail(steps: u32) -> DrawResult<u32> {
    if steps < 1 {
        return Err(DrawError::invalid_argument("curve detail must be at least 1"));
    }
    Ok(steps)
}

pub(crate) fn unknown_image(id: ImageId) -> DrawError {
    DrawError::invalid_argument(format!("{id:?} is not a live image"))
}

impl Canvas for Surface {
    fn pixel_buffer(&self) -> &PixelBuffer {
        &self.pixels
    }

    fn pixel_buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.pixels
    }

    fn compositor(&self) -> Compositor {
        self.compositor
    }
}
