use super::resolve::{hsb_to_rgb, pack, rgb_to_hsb, unpack};
use super::state::{ColorModel, ColorState};

impl ColorState {
    /// Rescales a byte channel into this state's range for channel `idx`.
    #[inline]
    fn to_range(&self, byte: u8, idx: usize) -> f32 {
        if self.is_default() {
            byte as f32
        } else {
            byte as f32 / 255.0 * self.maxima()[idx]
        }
    }

    pub fn red(&self, argb: u32) -> f32 {
        self.to_range(unpack(argb)[0], 0)
    }

    pub fn green(&self, argb: u32) -> f32 {
        self.to_range(unpack(argb)[1], 1)
    }

    pub fn blue(&self, argb: u32) -> f32 {
        self.to_range(unpack(argb)[2], 2)
    }

    pub fn alpha(&self, argb: u32) -> f32 {
        self.to_range(unpack(argb)[3], 3)
    }

    pub fn hue(&self, argb: u32) -> f32 {
        let [r, g, b, _] = unpack(argb);
        rgb_to_hsb(r, g, b)[0] * self.maxima()[0]
    }

    pub fn saturation(&self, argb: u32) -> f32 {
        let [r, g, b, _] = unpack(argb);
        rgb_to_hsb(r, g, b)[1] * self.maxima()[1]
    }

    pub fn brightness(&self, argb: u32) -> f32 {
        let [r, g, b, _] = unpack(argb);
        rgb_to_hsb(r, g, b)[2] * self.maxima()[2]
    }
}

/// Interpolates two packed colors; `t` is clamped to `[0, 1]`.
///
/// In HSB the hue travels the short way around the circle.
pub fn lerp_color(from: u32, to: u32, t: f32, model: ColorModel) -> u32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let a = unpack(from);
    let b = unpack(to);
    let mix = |x: f32, y: f32| x + (y - x) * t;

    match model {
        ColorModel::Rgb => {
            pack(std::array::from_fn(|i| mix(a[i] as f32, b[i] as f32).round() as u8))
        }
        ColorModel::Hsb => {
            let [mut h1, s1, v1] = rgb_to_hsb(a[0], a[1], a[2]);
            let [mut h2, s2, v2] = rgb_to_hsb(b[0], b[1], b[2]);
            if (h1 - h2).abs() > 0.5 {
                if h1 > h2 {
                    h2 += 1.0;
                } else {
                    h1 += 1.0;
                }
            }
            let h = mix(h1, h2) % 1.0;
            let rgb = hsb_to_rgb(h, mix(s1, s2), mix(v1, v2));
            let alpha = mix(a[3] as f32, b[3] as f32).round() as u8;
            let to8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
            pack([to8(rgb[0]), to8(rgb[1]), to8(rgb[2]), alpha])
        }
    }
}
