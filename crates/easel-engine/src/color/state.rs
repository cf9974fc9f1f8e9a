use crate::error::{DrawError, DrawResult};

/// How three-channel color inputs are interpreted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ColorModel {
    #[default]
    Rgb,
    /// Hue / saturation / brightness.
    Hsb,
}

/// Active color model plus the range each channel is expressed in.
///
/// Invariant: every maximum is finite and strictly positive.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorState {
    model: ColorModel,
    /// Channel maxima: `[x, y, z, alpha]`.
    max: [f32; 4],
    needs_scaling: bool,
    is_default: bool,
}

impl ColorState {
    /// Creates a state, validating the maxima.
    pub fn new(model: ColorModel, max_x: f32, max_y: f32, max_z: f32, max_a: f32) -> DrawResult<Self> {
        let max = [max_x, max_y, max_z, max_a];
        if let Some(bad) = max.iter().find(|m| !(m.is_finite() && **m > 0.0)) {
            return Err(DrawError::invalid_argument(format!(
                "color channel maximum must be a positive number, got {bad}"
            )));
        }
        // Scaling can be skipped only when every channel already lives in [0, 1].
        let needs_scaling = max_a != 1.0 || max_x != max_y || max_y != max_z || max_z != max_a;
        let is_default = model == ColorModel::Rgb && max.iter().all(|m| *m == 255.0);
        Ok(Self { model, max, needs_scaling, is_default })
    }

    /// Same maximum for all four channels.
    pub fn uniform(model: ColorModel, max: f32) -> DrawResult<Self> {
        Self::new(model, max, max, max, max)
    }

    /// RGB with every channel in `[0, 255]`.
    pub const fn rgb255() -> Self {
        Self { model: ColorModel::Rgb, max: [255.0; 4], needs_scaling: true, is_default: true }
    }

    /// RGB with every channel in `[0, 1]`; used to re-apply stored float channels.
    pub(crate) const fn unit_rgb() -> Self {
        Self { model: ColorModel::Rgb, max: [1.0; 4], needs_scaling: false, is_default: false }
    }

    #[inline]
    pub fn model(&self) -> ColorModel {
        self.model
    }

    /// `[x, y, z, alpha]` maxima.
    #[inline]
    pub fn maxima(&self) -> [f32; 4] {
        self.max
    }

    #[inline]
    pub fn needs_scaling(&self) -> bool {
        self.needs_scaling
    }

    /// True for RGB with all maxima at 255.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

impl Default for ColorState {
    fn default() -> Self {
        Self::rgb255()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_is_rgb_255() {
        let s = ColorState::default();
        assert!(s.is_default());
        assert!(s.needs_scaling());
        assert_eq!(s.model(), ColorModel::Rgb);
    }

    #[test]
    fn unit_range_needs_no_scaling() {
        let s = ColorState::uniform(ColorModel::Hsb, 1.0).unwrap();
        assert!(!s.needs_scaling());
        assert!(!s.is_default());
    }

    #[test]
    fn mixed_ranges_need_scaling() {
        let s = ColorState::new(ColorModel::Hsb, 360.0, 100.0, 100.0, 1.0).unwrap();
        assert!(s.needs_scaling());
    }

    #[test]
    fn rejects_non_positive_maxima() {
        let err = ColorState::new(ColorModel::Rgb, 255.0, 0.0, 255.0, 255.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(ColorState::uniform(ColorModel::Rgb, f32::NAN).is_err());
        assert!(ColorState::uniform(ColorModel::Rgb, -1.0).is_err());
    }
}
