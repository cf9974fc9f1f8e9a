use std::f32::consts::{PI, TAU};

use crate::coords::Vec3;
use crate::style::SphereDetail;

/// Unit-sphere sample grid for one detail setting: `v + 1` rings of `u`
/// points each, pole to pole.
#[derive(Debug, Clone)]
pub struct SphereTable {
    detail: SphereDetail,
    points: Vec<Vec3>,
}

impl SphereTable {
    fn build(detail: SphereDetail) -> Self {
        let (u, v) = (detail.u as usize, detail.v as usize);
        let mut points = Vec::with_capacity((v + 1) * u);
        for ring in 0..=v {
            let theta = PI * ring as f32 / v as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            for seg in 0..u {
                let phi = TAU * seg as f32 / u as f32;
                let (sin_p, cos_p) = phi.sin_cos();
                points.push(Vec3::new(sin_t * cos_p, -cos_t, sin_t * sin_p));
            }
        }
        Self { detail, points }
    }

    pub fn detail(&self) -> SphereDetail {
        self.detail
    }

    /// Unit point on `ring` (0 = top pole) at longitude `seg`, wrapping.
    pub fn point(&self, ring: usize, seg: usize) -> Vec3 {
        let u = self.detail.u as usize;
        self.points[ring * u + seg % u]
    }

    /// Vertex order for the triangle strip between `ring` and `ring + 1`.
    pub fn band(&self, ring: usize) -> impl Iterator<Item = Vec3> + '_ {
        (0..=self.detail.u as usize).flat_map(move |seg| [self.point(ring, seg), self.point(ring + 1, seg)])
    }

    pub fn bands(&self) -> usize {
        self.detail.v as usize
    }
}

/// Holds the table for the most recent detail setting.
#[derive(Debug, Default, Clone)]
pub struct SphereCache {
    table: Option<SphereTable>,
    builds: u64,
}

impl SphereCache {
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn table(&mut self, detail: SphereDetail) -> &SphereTable {
        if self.table.as_ref().is_none_or(|t| t.detail != detail) {
            self.builds += 1;
            log::debug!("sphere table rebuilt for {}x{}", detail.u, detail.v);
            self.table = Some(SphereTable::build(detail));
        }
        self.table.get_or_insert_with(|| SphereTable::build(detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_unit_length_and_poles_collapse() {
        let mut cache = SphereCache::default();
        let t = cache.table(SphereDetail::new(8, 4));
        for ring in 0..=4 {
            for seg in 0..8 {
                assert!((t.point(ring, seg).length() - 1.0).abs() < 1e-5);
            }
        }
        assert!(t.point(0, 0).chebyshev(t.point(0, 5)) < 1e-5);
        assert_eq!(t.band(1).count(), 18);
    }

    #[test]
    fn rebuilt_only_on_detail_change() {
        let mut cache = SphereCache::default();
        cache.table(SphereDetail::DEFAULT);
        cache.table(SphereDetail::DEFAULT);
        assert_eq!(cache.builds(), 1);
        cache.table(SphereDetail::new(10, 10));
        assert_eq!(cache.builds(), 2);
    }
}
