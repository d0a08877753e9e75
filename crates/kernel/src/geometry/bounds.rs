use serde::{Deserialize, Serialize};

use super::point::Point3d;

/// Axis-aligned box in engine space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Box around every finite point; `None` when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3d>) -> Option<Self> {
        let mut bb = Self::empty();
        let mut any = false;
        for p in points.into_iter().filter(|p| p.is_finite()) {
            bb.expand_to_include(p);
            any = true;
        }
        any.then_some(bb)
    }

    pub fn expand_to_include(&mut self, p: &Point3d) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }
}
