//! Drillhole records as held by the [`SurveyStore`](crate::store::SurveyStore).
//!
//! All depths are along-hole distances from the collar; coordinates are in
//! project units.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point3d;

/// Surface location and reference elevation of one hole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collar {
    pub east: f64,
    pub north: f64,
    /// Reference-level elevation.
    pub rl: f64,
    /// Total along-hole length.
    pub depth: f64,
}

impl Collar {
    /// Collar position in engine space: `(east, -rl, north)`.
    pub fn origin(&self) -> Point3d {
        Point3d::new(self.east, -self.rl, self.north)
    }
}

/// An orientation measurement at one depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    pub depth: f64,
    /// Compass bearing in degrees.
    pub azimuth: f64,
    /// Inclination in degrees; negative points down.
    pub dip: f64,
}

impl SurveyStation {
    /// A depth-zero station records set-up orientation only and never becomes
    /// a trace vertex.
    pub fn is_setup(&self) -> bool {
        self.depth == 0.0
    }
}

/// Half-open depth range `[from, to)` carrying one geology code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeologyInterval {
    pub from: f64,
    pub to: f64,
    pub code: String,
}

impl GeologyInterval {
    pub fn contains(&self, depth: f64) -> bool {
        self.from <= depth && depth < self.to
    }

    pub fn length(&self) -> f64 {
        self.to - self.from
    }
}

/// Trim and upper-case a raw geology code.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Everything loaded for one hole id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub collar: Option<Collar>,
    /// Sorted ascending by depth once loading finishes.
    pub stations: Vec<SurveyStation>,
    /// Stored in input order; never sorted.
    pub intervals: Vec<GeologyInterval>,
}
