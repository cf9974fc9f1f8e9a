/// Formula used to combine a source pixel with the destination.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum BlendMode {
    /// Source pixel written verbatim, alpha included.
    Replace,
    /// Straight alpha-over.
    #[default]
    Blend,
    Add,
    Subtract,
    Lightest,
    Darkest,
    Difference,
    Exclusion,
    Multiply,
    Screen,
    Overlay,
    HardLight,
    SoftLight,
    Dodge,
    Burn,
}

impl BlendMode {
    /// Every mode that mixes by source alpha (all but `Replace`).
    pub const MIXING: [BlendMode; 14] = [
        BlendMode::Blend,
        BlendMode::Add,
        BlendMode::Subtract,
        BlendMode::Lightest,
        BlendMode::Darkest,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Dodge,
        BlendMode::Burn,
    ];

    /// Raw per-channel result `C` for destination `a` and source `b`, both in `[0, 255]`.
    #[inline]
    fn channel(self, a: u32, b: u32) -> u32 {
        match self {
            BlendMode::Replace | BlendMode::Blend => b,
            BlendMode::Add => (a + b).min(255),
            BlendMode::Subtract => a.saturating_sub(b),
            BlendMode::Lightest => a.max(b),
            BlendMode::Darkest => a.min(b),
            BlendMode::Difference => a.abs_diff(b),
            BlendMode::Exclusion => a + b - 2 * a * b / 255,
            BlendMode::Multiply => a * b / 255,
            BlendMode::Screen => 255 - (255 - a) * (255 - b) / 255,
            BlendMode::Overlay => {
                if a < 128 {
                    2 * a * b / 255
                } else {
                    255 - 2 * (255 - a) * (255 - b) / 255
                }
            }
            BlendMode::HardLight => {
                if b < 128 {
                    2 * a * b / 255
                } else {
                    255 - 2 * (255 - a) * (255 - b) / 255
                }
            }
            BlendMode::SoftLight => {
                // (1 - a)·multiply + a·screen, expanded: a² + 2ab - 2a²b (unit range).
                let (a, b) = (a as i32, b as i32);
                let v = (a * a * (255 - 2 * b) + 2 * a * b * 255) / (255 * 255);
                v.clamp(0, 255) as u32
            }
            BlendMode::Dodge => {
                if b == 255 {
                    255
                } else {
                    (a * 255 / (255 - b)).min(255)
                }
            }
            BlendMode::Burn => {
                if b == 0 {
                    0
                } else {
                    255 - ((255 - a) * 255 / b).min(255)
                }
            }
        }
    }
}

/// Combines one source pixel with one destination pixel.
///
/// Except for `Replace`, each channel becomes `dst + (C - dst) · α` with the
/// source alpha mapped onto `0..=256` so that α = 0 leaves `dst` untouched and
/// α = 255 yields exactly `C`. Output alpha is `min(dst_a + src_a, 255)`.
#[inline]
pub fn blend_color(dst: u32, src: u32, mode: BlendMode) -> u32 {
    if mode == BlendMode::Replace {
        return src;
    }
    let sa = src >> 24;
    let weight = sa + u32::from(sa >= 0x7F);
    let inv = 256 - weight;
    let out_a = ((dst >> 24) + sa).min(255);

    let mut out = out_a << 24;
    for shift in [16u32, 8, 0] {
        let a = (dst >> shift) & 0xFF;
        let b = (src >> shift) & 0xFF;
        let c = mode.channel(a, b);
        out |= ((a * inv + c * weight) >> 8) << shift;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPAQUE_BLACK: u32 = 0xFF00_0000;
    const OPAQUE_WHITE: u32 = 0xFFFF_FFFF;
    const SAMPLES: [u32; 5] = [0xFF12_3456, 0xFF80_8080, 0xFFFF_0000, 0xFF00_FF7F, 0x8040_C0E0];

    // ── identities ────────────────────────────────────────────────────────

    #[test]
    fn replace_is_source() {
        for &d in &SAMPLES {
            assert_eq!(blend_color(d, 0x1234_5678, BlendMode::Replace), 0x1234_5678);
        }
    }

    #[test]
    fn zero_alpha_source_is_noop_for_mixing_modes() {
        for mode in BlendMode::MIXING {
            for &d in &SAMPLES {
                for src in [0x00FF_FFFF, 0x0000_0000, 0x0080_4020] {
                    assert_eq!(blend_color(d, src, mode), d, "{mode:?} dst={d:08X} src={src:08X}");
                }
            }
        }
    }

    #[test]
    fn opaque_blend_is_source() {
        assert_eq!(blend_color(0xFF11_2233, 0xFFAA_BBCC, BlendMode::Blend), 0xFFAA_BBCC);
    }

    // ── boundary values ───────────────────────────────────────────────────

    #[test]
    fn multiply_with_black_is_black() {
        for &c in &SAMPLES {
            let c = c | 0xFF00_0000;
            assert_eq!(blend_color(OPAQUE_BLACK, c, BlendMode::Multiply) & 0x00FF_FFFF, 0);
            assert_eq!(blend_color(c, OPAQUE_BLACK, BlendMode::Multiply) & 0x00FF_FFFF, 0);
        }
    }

    #[test]
    fn screen_with_white_is_white() {
        for &c in &SAMPLES {
            let c = c | 0xFF00_0000;
            assert_eq!(blend_color(OPAQUE_WHITE, c, BlendMode::Screen), OPAQUE_WHITE);
            assert_eq!(blend_color(c, OPAQUE_WHITE, BlendMode::Screen), OPAQUE_WHITE);
        }
    }

    #[test]
    fn add_and_subtract_clip() {
        assert_eq!(blend_color(0xFFF0_1010, 0xFF20_2020, BlendMode::Add), 0xFFFF_3030);
        assert_eq!(blend_color(0xFF10_F010, 0xFF20_2020, BlendMode::Subtract), 0xFF00_D000);
    }

    #[test]
    fn dodge_and_burn_extremes() {
        assert_eq!(blend_color(0xFF01_0101, OPAQUE_WHITE, BlendMode::Dodge), OPAQUE_WHITE);
        assert_eq!(blend_color(0xFFFE_FEFE, OPAQUE_BLACK, BlendMode::Burn), OPAQUE_BLACK);
    }

    #[test]
    fn difference_and_exclusion() {
        assert_eq!(blend_color(0xFF30_0000, 0xFF10_0000, BlendMode::Difference), 0xFF20_0000);
        // Exclusion with white inverts.
        assert_eq!(blend_color(0xFF30_0000, OPAQUE_WHITE, BlendMode::Exclusion), 0xFFCF_FFFF);
    }

    #[test]
    fn overlay_branches_on_destination() {
        // Dark destination: multiply-like, stays dark with a dark source.
        assert_eq!(blend_color(0xFF40_4040, 0xFF40_4040, BlendMode::Overlay), 0xFF20_2020);
        // Hard light branches on the source instead.
        let o = blend_color(0xFF40_4040, 0xFFC0_C0C0, BlendMode::Overlay);
        let h = blend_color(0xFF40_4040, 0xFFC0_C0C0, BlendMode::HardLight);
        assert_ne!(o, h);
    }

    #[test]
    fn soft_light_keeps_extremes() {
        assert_eq!(blend_color(OPAQUE_BLACK, 0xFF80_8080, BlendMode::SoftLight), OPAQUE_BLACK);
        assert_eq!(blend_color(OPAQUE_WHITE, 0xFF80_8080, BlendMode::SoftLight), OPAQUE_WHITE);
    }

    #[test]
    fn alpha_accumulates_and_saturates() {
        let out = blend_color(0x8000_0000, 0x90FF_FFFF, BlendMode::Blend);
        assert_eq!(out >> 24, 0xFF);
        let out = blend_color(0x1000_0000, 0x2000_0000, BlendMode::Blend);
        assert_eq!(out >> 24, 0x30);
    }
}
