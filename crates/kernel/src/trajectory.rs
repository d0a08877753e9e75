//! Desurveying: walking a hole's stations from the collar to place arbitrary
//! depths in 3D.
//!
//! Each station's orientation holds from its own depth to the next station's
//! depth (or to end of hole for the last one). Segments are straight; there
//! is no blending between consecutive orientations.

use crate::error::DesurveyError;
use crate::geometry::point::Point3d;
use crate::model::{Collar, SurveyStation};
use crate::projector::project;
use crate::store::SurveyStore;

/// A borrowed view of one hole, ready to answer depth queries.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryWalker<'a> {
    hole_id: &'a str,
    collar: Collar,
    stations: &'a [SurveyStation],
}

impl<'a> TrajectoryWalker<'a> {
    pub fn new(hole_id: &'a str, collar: Collar, stations: &'a [SurveyStation]) -> Self {
        Self {
            hole_id,
            collar,
            stations,
        }
    }

    pub fn hole_id(&self) -> &'a str {
        self.hole_id
    }

    pub fn collar(&self) -> &Collar {
        &self.collar
    }

    pub fn stations(&self) -> &'a [SurveyStation] {
        self.stations
    }

    /// Position at along-hole `depth`.
    ///
    /// Depths past the last segment extrapolate along its orientation. A hole
    /// without stations is treated as a straight line from the collar along
    /// `+y`. Non-finite results are reported as
    /// [`DesurveyError::UnresolvedDepth`].
    pub fn point_at_depth(&self, depth: f64) -> Result<Point3d, DesurveyError> {
        let point = self.raw_point_at_depth(depth);
        if point.is_finite() {
            Ok(point)
        } else {
            Err(DesurveyError::UnresolvedDepth {
                hole_id: self.hole_id.to_string(),
                depth,
            })
        }
    }

    fn raw_point_at_depth(&self, depth: f64) -> Point3d {
        let origin = self.collar.origin();
        let Some(last) = self.stations.len().checked_sub(1) else {
            return Point3d::new(origin.x, origin.y + depth, origin.z);
        };

        let mut position = origin;
        let mut walked = 0.0;
        for (i, current) in self.stations.iter().enumerate() {
            let next = self.stations.get(i + 1);
            let segment_end = next.map_or(self.collar.depth, |n| n.depth);

            if depth <= segment_end || i == last {
                return position + project(depth - walked, current.azimuth, current.dip);
            }

            if let Some(next) = next {
                position += project(next.depth - current.depth, current.azimuth, current.dip);
                walked = next.depth;
            }
        }
        // The loop always returns on its final iteration.
        position
    }

    /// Coarse depth recovered from a point's vertical offset below the collar.
    ///
    /// Horizontal deviation is ignored, so this is only meaningful as a sort
    /// key for points this walker produced (unexaggerated). It is not an
    /// inverse of [`point_at_depth`](Self::point_at_depth).
    pub fn depth_from_point(&self, point: &Point3d) -> f64 {
        self.collar.origin().y - point.y
    }

    /// Collar, each non-set-up station, then end of hole.
    pub fn trace(&self) -> Result<Vec<Point3d>, DesurveyError> {
        let mut depths = vec![0.0];
        depths.extend(
            self.stations
                .iter()
                .filter(|s| !s.is_setup())
                .map(|s| s.depth),
        );
        if depths.last().is_none_or(|&d| d < self.collar.depth) {
            depths.push(self.collar.depth);
        }
        depths
            .into_iter()
            .map(|d| self.point_at_depth(d))
            .collect()
    }
}

impl SurveyStore {
    /// Walker for `hole_id`, or [`DesurveyError::MissingCollar`].
    pub fn walker<'a>(&'a self, hole_id: &'a str) -> Result<TrajectoryWalker<'a>, DesurveyError> {
        let collar = self
            .collar(hole_id)
            .copied()
            .ok_or_else(|| DesurveyError::MissingCollar {
                hole_id: hole_id.to_string(),
            })?;
        Ok(TrajectoryWalker::new(hole_id, collar, self.stations(hole_id)))
    }

    /// Engine-space point at along-hole `depth` in `hole_id`.
    pub fn point_at_depth(&self, hole_id: &str, depth: f64) -> Result<Point3d, DesurveyError> {
        self.walker(hole_id)?.point_at_depth(depth)
    }

    /// See [`TrajectoryWalker::depth_from_point`].
    pub fn depth_from_point(&self, hole_id: &str, point: &Point3d) -> Result<f64, DesurveyError> {
        Ok(self.walker(hole_id)?.depth_from_point(point))
    }

    /// Hole path through its station depths, with the configured vertical
    /// exaggeration applied.
    pub fn hole_trace(&self, hole_id: &str) -> Result<Vec<Point3d>, DesurveyError> {
        let factor = self.config().vertical_exaggeration;
        let trace = self.walker(hole_id)?.trace()?;
        Ok(trace.into_iter().map(|p| p.exaggerated(factor)).collect())
    }
}
