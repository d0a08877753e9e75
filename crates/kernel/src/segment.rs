//! Geology-interval polylines.
//!
//! Each interval is sampled at its bounds, at every survey breakpoint inside
//! it, and at a fixed fill spacing. Fill samples that land near a survey
//! depth are dropped so the downstream curve fit never sees near-coincident
//! vertices.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::DesurveyConfig;
use crate::error::DesurveyError;
use crate::geometry::point::Point3d;
use crate::model::GeologyInterval;
use crate::store::SurveyStore;
use crate::trajectory::TrajectoryWalker;

/// Upper bound on fill samples per interval.
pub const MAX_FILL_SAMPLES: u32 = 10_000;

/// Polyline for one geology interval, ready for a tube or line renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalGeometry {
    pub interval: GeologyInterval,
    pub points: Vec<Point3d>,
}

/// An interval that produced no geometry, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInterval {
    pub interval: GeologyInterval,
    pub error: DesurveyError,
}

/// Everything the renderer needs for one hole.
#[derive(Debug, Clone, PartialEq)]
pub struct HoleGeometry {
    pub hole_id: String,
    /// Collar, station points and end of hole.
    pub trace: Vec<Point3d>,
    pub has_survey: bool,
    pub intervals: Vec<IntervalGeometry>,
    pub skipped: Vec<SkippedInterval>,
}

/// Depths sampled along `interval`, ascending with duplicates removed.
///
/// `breakpoints` are the hole's survey depths plus its end-of-hole depth.
pub fn sample_depths(
    interval: &GeologyInterval,
    breakpoints: &[f64],
    config: &DesurveyConfig,
) -> Vec<f64> {
    let (from, to) = (interval.from, interval.to);
    let mut depths = vec![from];

    depths.extend(breakpoints.iter().copied().filter(|&d| d > from && d < to));

    let step = config.fill_step(interval.length());
    if step > 0.0 {
        let half = step / 2.0;
        for k in 1..=MAX_FILL_SAMPLES {
            let d = from + step * f64::from(k);
            if !(d < to) {
                break;
            }
            if !breakpoints.iter().any(|bp| (d - bp).abs() < half) {
                depths.push(d);
            }
        }
    }

    depths.push(to);

    let mut unique: Vec<f64> = Vec::with_capacity(depths.len());
    for d in depths {
        if !unique.iter().any(|u| (u - d).abs() <= config.tolerance) {
            unique.push(d);
        }
    }
    unique.sort_by(f64::total_cmp);
    unique
}

fn breakpoints(walker: &TrajectoryWalker<'_>) -> Vec<f64> {
    walker
        .stations()
        .iter()
        .map(|s| s.depth)
        .chain(std::iter::once(walker.collar().depth))
        .collect()
}

fn interval_points(
    walker: &TrajectoryWalker<'_>,
    interval: &GeologyInterval,
    breakpoints: &[f64],
    config: &DesurveyConfig,
) -> Result<Vec<Point3d>, DesurveyError> {
    let mut keyed: Vec<(f64, f64, Point3d)> = sample_depths(interval, breakpoints, config)
        .into_iter()
        .filter_map(|d| match walker.point_at_depth(d) {
            Ok(p) => Some((walker.depth_from_point(&p), d, p)),
            Err(e) => {
                debug!(hole_id = walker.hole_id(), depth = d, error = %e, "dropping sample");
                None
            }
        })
        .collect();

    if keyed.len() < 2 {
        return Err(DesurveyError::InsufficientIntervalPoints {
            hole_id: walker.hole_id().to_string(),
            from: interval.from,
            to: interval.to,
            count: keyed.len(),
        });
    }

    // Level stretches share a depth key; along-hole depth breaks the tie.
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    Ok(keyed
        .into_iter()
        .map(|(_, _, p)| p.exaggerated(config.vertical_exaggeration))
        .collect())
}

impl SurveyStore {
    /// Ordered polyline (at least two points) for one interval of `hole_id`.
    #[instrument(skip(self, interval), fields(from = interval.from, to = interval.to))]
    pub fn build_interval_polyline(
        &self,
        hole_id: &str,
        interval: &GeologyInterval,
    ) -> Result<Vec<Point3d>, DesurveyError> {
        let walker = self.walker(hole_id)?;
        interval_points(&walker, interval, &breakpoints(&walker), self.config())
    }

    /// Trace plus interval polylines for one hole. Intervals that cannot be
    /// built are collected in [`HoleGeometry::skipped`] rather than failing
    /// the hole.
    #[instrument(skip(self))]
    pub fn build_hole_geometry(&self, hole_id: &str) -> Result<HoleGeometry, DesurveyError> {
        let walker = self.walker(hole_id)?;
        let config = self.config();
        let trace = self.hole_trace(hole_id)?;
        let breakpoints = breakpoints(&walker);

        let mut intervals = Vec::new();
        let mut skipped = Vec::new();
        for interval in self.intervals(hole_id) {
            match interval_points(&walker, interval, &breakpoints, config) {
                Ok(points) => intervals.push(IntervalGeometry {
                    interval: interval.clone(),
                    points,
                }),
                Err(error) => {
                    warn!(hole_id, from = interval.from, to = interval.to, %error, "skipping geology interval");
                    skipped.push(SkippedInterval {
                        interval: interval.clone(),
                        error,
                    });
                }
            }
        }

        debug!(
            hole_id,
            trace_points = trace.len(),
            intervals = intervals.len(),
            skipped = skipped.len(),
            "hole geometry built"
        );
        Ok(HoleGeometry {
            hole_id: hole_id.to_string(),
            trace,
            has_survey: !walker.stations().is_empty(),
            intervals,
            skipped,
        })
    }

    /// Geometry for every collared hole, sorted by hole id. Holes that fail
    /// are logged and left out.
    #[instrument(skip(self))]
    pub fn build_all(&self) -> Vec<HoleGeometry> {
        let mut ids: Vec<&str> = self.all_hole_ids().collect();
        ids.sort_unstable();

        let mut built = Vec::with_capacity(ids.len());
        for id in ids {
            match self.build_hole_geometry(id) {
                Ok(geometry) => built.push(geometry),
                Err(error) => warn!(hole_id = id, %error, "skipping hole"),
            }
        }

        let surveyed = built.iter().filter(|g| g.has_survey).count();
        info!(
            holes = built.len(),
            surveyed,
            vertical = built.len() - surveyed,
            intervals = built.iter().map(|g| g.intervals.len()).sum::<usize>(),
            "drillhole geometry built"
        );
        built
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(from: f64, to: f64) -> GeologyInterval {
        GeologyInterval {
            from,
            to,
            code: "OX".to_string(),
        }
    }

    #[test]
    fn test_short_interval_keeps_bounds() {
        let depths = sample_depths(&iv(10.0, 12.0), &[100.0], &DesurveyConfig::default());
        assert_eq!(depths, vec![10.0, 12.0]);
    }

    #[test]
    fn test_fill_uses_tenth_of_long_interval() {
        let depths = sample_depths(&iv(0.0, 200.0), &[500.0], &DesurveyConfig::default());
        let expected: Vec<f64> = (0..=10).map(|k| f64::from(k) * 20.0).collect();
        assert_eq!(depths, expected);
    }

    #[test]
    fn test_fill_near_breakpoint_is_dropped() {
        // step 5, half-step 2.5: fill at 20 is within 1 of the station at 21.
        let depths = sample_depths(&iv(0.0, 30.0), &[21.0, 100.0], &DesurveyConfig::default());
        assert!(depths.contains(&21.0));
        assert!(!depths.contains(&20.0));
        assert!(depths.contains(&15.0));
        assert!(depths.contains(&25.0));
        assert_eq!(depths.first(), Some(&0.0));
        assert_eq!(depths.last(), Some(&30.0));
    }

    #[test]
    fn test_breakpoints_on_bounds_are_not_duplicated() {
        let depths = sample_depths(&iv(0.0, 4.0), &[0.0, 4.0], &DesurveyConfig::default());
        assert_eq!(depths, vec![0.0, 4.0]);
    }

    #[test]
    fn test_duplicate_station_depths_collapse() {
        let depths = sample_depths(&iv(0.0, 4.0), &[2.0, 2.0], &DesurveyConfig::default());
        assert_eq!(depths, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_nan_bounds_yield_no_fill() {
        let depths = sample_depths(&iv(f64::NAN, 10.0), &[5.0], &DesurveyConfig::default());
        assert_eq!(depths.len(), 2);
        assert!(depths.iter().any(|d| d.is_nan()));
    }

    #[test]
    fn test_breakpoints_are_merged_in_depth_order() {
        let depths = sample_depths(&iv(0.0, 30.0), &[21.0, 100.0], &DesurveyConfig::default());
        assert_eq!(depths, vec![0.0, 5.0, 10.0, 15.0, 21.0, 25.0, 30.0]);
    }

    #[test]
    fn test_extreme_fill_divisions_are_bounded() {
        let config = DesurveyConfig {
            min_fill_step: 0.0,
            fill_divisions: u32::MAX,
            ..DesurveyConfig::default()
        };
        let depths = sample_depths(&iv(0.0, 1.0e6), &[], &config);
        assert!(depths.len() <= MAX_FILL_SAMPLES as usize + 2);
        assert_eq!(depths.first(), Some(&0.0));
        assert_eq!(depths.last(), Some(&1.0e6));
    }
}
