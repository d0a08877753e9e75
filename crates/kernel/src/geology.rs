//! Depth to geology-code lookup.

use crate::model::GeologyInterval;
use crate::store::SurveyStore;

/// First interval, in the order given, whose `[from, to)` range holds `depth`.
///
/// Intervals are scanned linearly and never sorted, so when ranges overlap
/// the earlier one wins.
pub fn interval_at(intervals: &[GeologyInterval], depth: f64) -> Option<&GeologyInterval> {
    intervals.iter().find(|iv| iv.contains(depth))
}

impl SurveyStore {
    /// Geology code at `depth`, or the configured unknown code when no
    /// interval (or no hole) matches.
    pub fn geology_at(&self, hole_id: &str, depth: f64) -> &str {
        interval_at(self.intervals(hole_id), depth)
            .map_or(self.config().unknown_code.as_str(), |iv| iv.code.as_str())
    }
}
