use super::state::{ColorModel, ColorState};

/// Heterogeneous color argument accepted by every color-taking call.
///
/// Integers are ambiguous: see [`ColorState::resolve`] for how a packed pixel
/// is told apart from a grayscale level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ColorInput {
    Int(u32),
    IntAlpha(u32, f32),
    Gray(f32),
    GrayAlpha(f32, f32),
    Channels(f32, f32, f32),
    ChannelsAlpha(f32, f32, f32, f32),
}

impl From<u32> for ColorInput {
    fn from(v: u32) -> Self {
        ColorInput::Int(v)
    }
}

impl From<(u32, f32)> for ColorInput {
    fn from((v, a): (u32, f32)) -> Self {
        ColorInput::IntAlpha(v, a)
    }
}

impl From<f32> for ColorInput {
    fn from(v: f32) -> Self {
        ColorInput::Gray(v)
    }
}

impl From<(f32, f32)> for ColorInput {
    fn from((v, a): (f32, f32)) -> Self {
        ColorInput::GrayAlpha(v, a)
    }
}

impl From<(f32, f32, f32)> for ColorInput {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        ColorInput::Channels(x, y, z)
    }
}

impl From<(f32, f32, f32, f32)> for ColorInput {
    fn from((x, y, z, a): (f32, f32, f32, f32)) -> Self {
        ColorInput::ChannelsAlpha(x, y, z, a)
    }
}

/// Canonical result of color resolution.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResolvedColor {
    /// Packed `0xAARRGGBB`.
    pub argb: u32,
    /// Straight-alpha channels in `[0, 1]`: r, g, b, a.
    pub rgba: [f32; 4],
    /// `rgba` scaled to `[0, 255]`.
    pub rgba8: [u8; 4],
    /// Alpha below fully opaque.
    pub partial_alpha: bool,
}

impl ResolvedColor {
    /// Builds the integer/packed forms from float channels already in `[0, 1]`.
    pub(crate) fn from_unit(rgba: [f32; 4]) -> Self {
        let rgba8 = rgba.map(unit_to_u8);
        Self {
            argb: pack(rgba8),
            rgba,
            rgba8,
            partial_alpha: rgba8[3] != 255,
        }
    }

    /// Exact conversion of a packed pixel.
    pub fn from_argb(argb: u32) -> Self {
        let rgba8 = unpack(argb);
        Self {
            argb,
            rgba: rgba8.map(|c| c as f32 / 255.0),
            rgba8,
            partial_alpha: rgba8[3] != 255,
        }
    }

    pub const fn opaque_black() -> Self {
        Self { argb: 0xFF00_0000, rgba: [0.0, 0.0, 0.0, 1.0], rgba8: [0, 0, 0, 255], partial_alpha: false }
    }

    pub const fn opaque_white() -> Self {
        Self {
            argb: 0xFFFF_FFFF,
            rgba: [1.0, 1.0, 1.0, 1.0],
            rgba8: [255, 255, 255, 255],
            partial_alpha: false,
        }
    }
}

#[inline]
fn unit_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
pub(crate) fn pack([r, g, b, a]: [u8; 4]) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline]
pub(crate) fn unpack(argb: u32) -> [u8; 4] {
    [(argb >> 16) as u8, (argb >> 8) as u8, argb as u8, (argb >> 24) as u8]
}

/// Clamps NaN to zero as well as the usual range.
#[inline]
fn clamp_channel(v: f32, max: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, max) }
}

/// Standard six-sector HSB → RGB conversion. Inputs in `[0, 1]`.
pub(crate) fn hsb_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    if s == 0.0 {
        return [v, v, v];
    }
    let which = (h - h.floor()) * 6.0;
    let f = which - which.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match which as u32 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// RGB bytes → HSB in `[0, 1]`.
pub(crate) fn rgb_to_hsb(r: u8, g: u8, b: u8) -> [f32; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let cmax = r.max(g).max(b);
    let cmin = r.min(g).min(b);
    let brightness = cmax / 255.0;
    let saturation = if cmax != 0.0 { (cmax - cmin) / cmax } else { 0.0 };
    if saturation == 0.0 {
        return [0.0, 0.0, brightness];
    }
    let span = cmax - cmin;
    let rc = (cmax - r) / span;
    let gc = (cmax - g) / span;
    let bc = (cmax - b) / span;
    let sector = if r == cmax {
        bc - gc
    } else if g == cmax {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let mut hue = sector / 6.0;
    if hue < 0.0 {
        hue += 1.0;
    }
    [hue, saturation, brightness]
}

impl ColorState {
    /// Resolves any color argument under this state. Pure; never fails.
    ///
    /// An integer is a packed pixel when its top byte is nonzero or it is
    /// larger than the first channel maximum, otherwise it is a gray level.
    /// `0x00000080` under the default state therefore means gray 128, not a
    /// transparent blue; callers relying on that reading keep working.
    pub fn resolve(&self, input: impl Into<ColorInput>) -> ResolvedColor {
        let max_a = self.maxima()[3];
        match input.into() {
            ColorInput::Int(v) => {
                if self.is_packed(v) {
                    self.resolve_packed(v, max_a)
                } else {
                    self.resolve_gray(v as f32, max_a)
                }
            }
            ColorInput::IntAlpha(v, a) => {
                if self.is_packed(v) {
                    self.resolve_packed(v, a)
                } else {
                    self.resolve_gray(v as f32, a)
                }
            }
            ColorInput::Gray(v) => self.resolve_gray(v, max_a),
            ColorInput::GrayAlpha(v, a) => self.resolve_gray(v, a),
            ColorInput::Channels(x, y, z) => self.resolve_channels(x, y, z, max_a),
            ColorInput::ChannelsAlpha(x, y, z, a) => self.resolve_channels(x, y, z, a),
        }
    }

    #[inline]
    fn is_packed(&self, v: u32) -> bool {
        (v & 0xFF00_0000) != 0 || v as f32 > self.maxima()[0]
    }

    fn scale_alpha(&self, a: f32) -> f32 {
        let max_a = self.maxima()[3];
        let a = clamp_channel(a, max_a);
        if self.needs_scaling() { a / max_a } else { a }
    }

    fn resolve_packed(&self, argb: u32, alpha: f32) -> ResolvedColor {
        let max_a = self.maxima()[3];
        if alpha == max_a {
            return ResolvedColor::from_argb(argb);
        }
        let factor = if alpha.is_nan() { 0.0 } else { (alpha / max_a).clamp(0.0, 1.0) };
        let a = ((argb >> 24) as f32 * factor).round() as u32;
        ResolvedColor::from_argb(a << 24 | (argb & 0x00FF_FFFF))
    }

    fn resolve_gray(&self, gray: f32, alpha: f32) -> ResolvedColor {
        let max_x = self.maxima()[0];
        let g = clamp_channel(gray, max_x);
        let g = if self.needs_scaling() { g / max_x } else { g };
        ResolvedColor::from_unit([g, g, g, self.scale_alpha(alpha)])
    }

    fn resolve_channels(&self, x: f32, y: f32, z: f32, alpha: f32) -> ResolvedColor {
        let [mx, my, mz, _] = self.maxima();
        let (x, y, z) = (clamp_channel(x, mx), clamp_channel(y, my), clamp_channel(z, mz));
        let a = self.scale_alpha(alpha);
        let rgb = match self.model() {
            ColorModel::Rgb => {
                if self.needs_scaling() {
                    [x / mx, y / my, z / mz]
                } else {
                    [x, y, z]
                }
            }
            ColorModel::Hsb => hsb_to_rgb(x / mx, y / my, z / mz),
        };
        ResolvedColor::from_unit([rgb[0], rgb[1], rgb[2], a])
    }
}
