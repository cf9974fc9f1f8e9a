/// How the four numbers given to `rect`, `ellipse` or `image` place the shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PlacementMode {
    /// `(x, y)` is the top-left corner, then width and height.
    Corner,
    /// Two opposite corners.
    Corners,
    /// `(x, y)` is the center, then width and height (ellipse "diameter" mode).
    Center,
    /// `(x, y)` is the center, then half-width and half-height.
    Radius,
}

impl PlacementMode {
    /// Alias for [`PlacementMode::Center`] as accepted by `ellipse_mode`.
    pub const DIAMETER: PlacementMode = PlacementMode::Center;

    /// Resolves `(a, b, c, d)` to a normalized `(x, y, w, h)` box.
    pub fn resolve(self, a: f32, b: f32, c: f32, d: f32) -> (f32, f32, f32, f32) {
        let (x, y, w, h) = match self {
            PlacementMode::Corner => (a, b, c, d),
            PlacementMode::Corners => (a, b, c - a, d - b),
            PlacementMode::Center => (a - c / 2.0, b - d / 2.0, c, d),
            PlacementMode::Radius => (a - c, b - d, c * 2.0, d * 2.0),
        };
        let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
        let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
        (x, y, w, h)
    }
}

/// Outline closure for `arc`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ArcMode {
    /// Fills the region bounded by the curve and its chord; strokes only the curve.
    #[default]
    Open,
    /// Endpoints joined by a straight edge.
    Chord,
    /// Closed through the center.
    Pie,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum StrokeCap {
    #[default]
    Round,
    Square,
    Project,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_and_corners_agree() {
        assert_eq!(PlacementMode::Corner.resolve(10.0, 10.0, 20.0, 20.0), (10.0, 10.0, 20.0, 20.0));
        assert_eq!(PlacementMode::Corners.resolve(10.0, 10.0, 30.0, 30.0), (10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn center_and_radius() {
        assert_eq!(PlacementMode::Center.resolve(50.0, 50.0, 20.0, 10.0), (40.0, 45.0, 20.0, 10.0));
        assert_eq!(PlacementMode::Radius.resolve(50.0, 50.0, 20.0, 10.0), (30.0, 40.0, 40.0, 20.0));
    }

    #[test]
    fn diameter_is_center() {
        assert_eq!(PlacementMode::DIAMETER, PlacementMode::Center);
        assert_eq!(
            PlacementMode::DIAMETER.resolve(50.0, 50.0, 20.0, 10.0),
            PlacementMode::Center.resolve(50.0, 50.0, 20.0, 10.0)
        );
    }

    #[test]
    fn negative_sizes_are_normalized() {
        assert_eq!(PlacementMode::Corner.resolve(10.0, 10.0, -4.0, -6.0), (6.0, 4.0, 4.0, 6.0));
        assert_eq!(PlacementMode::Corners.resolve(30.0, 30.0, 10.0, 10.0), (10.0, 10.0, 20.0, 20.0));
    }
}
