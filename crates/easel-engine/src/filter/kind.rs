use crate::error::{DrawError, DrawResult};

/// Filter selector for the untyped entry point ([`Filter::from_kind`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FilterKind {
    Gray,
    Invert,
    Posterize,
    Threshold,
    Opaque,
    Blur,
    Erode,
    Dilate,
}

/// A validated raster filter with its parameter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Filter {
    Gray,
    Invert,
    /// Levels per channel, `2..=255`.
    Posterize { levels: u32 },
    /// Cutoff in `[0, 1]`.
    Threshold { level: f32 },
    Opaque,
    /// Blur radius; the kernel spans `radius · 3.5` pixels each side.
    Blur { radius: f32 },
    Erode,
    Dilate,
}

impl Filter {
    pub const DEFAULT_THRESHOLD: f32 = 0.5;
    pub const DEFAULT_BLUR_RADIUS: f32 = 1.0;

    pub fn posterize(levels: u32) -> DrawResult<Self> {
        if !(2..=255).contains(&levels) {
            return Err(DrawError::invalid_argument(format!(
                "posterize levels must be between 2 and 255, got {levels}"
            )));
        }
        Ok(Filter::Posterize { levels })
    }

    pub fn threshold(level: f32) -> DrawResult<Self> {
        if !(0.0..=1.0).contains(&level) {
            return Err(DrawError::invalid_argument(format!(
                "threshold level must be between 0 and 1, got {level}"
            )));
        }
        Ok(Filter::Threshold { level })
    }

    pub fn blur(radius: f32) -> DrawResult<Self> {
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(DrawError::invalid_argument(format!("blur radius must be non-negative, got {radius}")));
        }
        Ok(Filter::Blur { radius })
    }

    /// Builds a filter from a kind and an optional numeric parameter.
    ///
    /// `Posterize` requires the parameter; `Threshold` and `Blur` default it;
    /// every other kind rejects one.
    pub fn from_kind(kind: FilterKind, param: Option<f32>) -> DrawResult<Self> {
        match (kind, param) {
            (FilterKind::Posterize, None) => {
                Err(DrawError::invalid_argument("posterize needs a level count"))
            }
            (FilterKind::Posterize, Some(p)) => {
                if p.fract() != 0.0 || p < 0.0 {
                    return Err(DrawError::invalid_argument(format!(
                        "posterize levels must be a whole number, got {p}"
                    )));
                }
                Filter::posterize(p as u32)
            }
            (FilterKind::Threshold, p) => Filter::threshold(p.unwrap_or(Self::DEFAULT_THRESHOLD)),
            (FilterKind::Blur, p) => Filter::blur(p.unwrap_or(Self::DEFAULT_BLUR_RADIUS)),
            (kind, Some(p)) => Err(DrawError::invalid_argument(format!(
                "{kind:?} takes no parameter, got {p}"
            ))),
            (FilterKind::Gray, None) => Ok(Filter::Gray),
            (FilterKind::Invert, None) => Ok(Filter::Invert),
            (FilterKind::Opaque, None) => Ok(Filter::Opaque),
            (FilterKind::Erode, None) => Ok(Filter::Erode),
            (FilterKind::Dilate, None) => Ok(Filter::Dilate),
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::Gray => FilterKind::Gray,
            Filter::Invert => FilterKind::Invert,
            Filter::Posterize { .. } => FilterKind::Posterize,
            Filter::Threshold { .. } => FilterKind::Threshold,
            Filter::Opaque => FilterKind::Opaque,
            Filter::Blur { .. } => FilterKind::Blur,
            Filter::Erode => FilterKind::Erode,
            Filter::Dilate => FilterKind::Dilate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn parameterless_kinds_reject_parameter() {
        for kind in [FilterKind::Gray, FilterKind::Invert, FilterKind::Opaque, FilterKind::Erode, FilterKind::Dilate] {
            let err = Filter::from_kind(kind, Some(1.0)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert_eq!(Filter::from_kind(kind, None).unwrap().kind(), kind);
        }
    }

    #[test]
    fn posterize_needs_valid_levels() {
        assert!(Filter::from_kind(FilterKind::Posterize, None).is_err());
        assert!(Filter::from_kind(FilterKind::Posterize, Some(1.0)).is_err());
        assert!(Filter::from_kind(FilterKind::Posterize, Some(256.0)).is_err());
        assert!(Filter::from_kind(FilterKind::Posterize, Some(2.5)).is_err());
        assert_eq!(Filter::from_kind(FilterKind::Posterize, Some(4.0)).unwrap(), Filter::Posterize { levels: 4 });
    }

    #[test]
    fn defaults_for_optional_parameters() {
        assert_eq!(Filter::from_kind(FilterKind::Threshold, None).unwrap(), Filter::Threshold { level: 0.5 });
        assert_eq!(Filter::from_kind(FilterKind::Blur, None).unwrap(), Filter::Blur { radius: 1.0 });
        assert!(Filter::from_kind(FilterKind::Threshold, Some(1.5)).is_err());
        assert!(Filter::from_kind(FilterKind::Blur, Some(-1.0)).is_err());
    }
}
