//! Data-quality audit of a loaded store.
//!
//! The engine tolerates dirty input (NaN fields, overlapping or unordered
//! intervals, duplicate station depths); the audit reports those conditions
//! without altering anything, so a shell can surface them to the user.

pub mod types;

pub use types::*;

use tracing::{info, instrument};

use crate::model::{Collar, GeologyInterval, Hole, SurveyStation};
use crate::store::SurveyStore;

/// Audit every hole in `store`, collared or not, using the store's own
/// tolerance.
#[instrument(skip_all)]
pub fn audit_store(store: &SurveyStore) -> AuditReport {
    let tolerance = store.config().tolerance;
    let mut holes: Vec<(&str, &Hole)> = store.holes().collect();
    holes.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut report = AuditReport {
        holes_checked: holes.len(),
        findings: Vec::new(),
    };
    for (hole_id, hole) in holes {
        let mut audit = HoleAudit {
            hole_id,
            tolerance,
            findings: &mut report.findings,
        };
        audit.check_hole(hole);
    }

    info!(
        holes = report.holes_checked,
        error_count = report.errors().count(),
        warning_count = report.warnings().count(),
        "drillhole audit complete"
    );
    report
}

struct HoleAudit<'a> {
    hole_id: &'a str,
    tolerance: f64,
    findings: &'a mut Vec<Finding>,
}

impl HoleAudit<'_> {
    fn push(&mut self, code: FindingCode, severity: Severity, message: String, value: Option<f64>) {
        self.findings.push(Finding {
            hole_id: self.hole_id.to_string(),
            code,
            severity,
            message,
            value,
        });
    }

    fn check_hole(&mut self, hole: &Hole) {
        match &hole.collar {
            Some(collar) => self.check_collar(collar),
            None => self.push(
                FindingCode::MissingCollar,
                Severity::Error,
                "survey or geology data without a collar".into(),
                None,
            ),
        }
        self.check_stations(&hole.stations, hole.collar.as_ref());
        self.check_intervals(&hole.intervals);
    }

    fn check_collar(&mut self, collar: &Collar) {
        for (name, value) in [
            ("east", collar.east),
            ("north", collar.north),
            ("rl", collar.rl),
            ("depth", collar.depth),
        ] {
            if !value.is_finite() {
                self.push(
                    FindingCode::NonFiniteValue,
                    Severity::Error,
                    format!("collar {name} is not a number"),
                    None,
                );
            }
        }
        if collar.depth < 0.0 {
            self.push(
                FindingCode::NegativeDepth,
                Severity::Error,
                "collar depth is negative".into(),
                Some(collar.depth),
            );
        }
    }

    fn check_stations(&mut self, stations: &[SurveyStation], collar: Option<&Collar>) {
        for s in stations {
            if !(s.depth.is_finite() && s.azimuth.is_finite() && s.dip.is_finite()) {
                self.push(
                    FindingCode::NonFiniteValue,
                    Severity::Error,
                    "survey station has a non-numeric field".into(),
                    Some(s.depth),
                );
            }
            if let Some(c) = collar {
                if s.depth > c.depth + self.tolerance {
                    self.push(
                        FindingCode::StationBeyondEndOfHole,
                        Severity::Warning,
                        format!("station deeper than collar depth {}", c.depth),
                        Some(s.depth),
                    );
                }
            }
        }
        for pair in stations.windows(2) {
            if (pair[1].depth - pair[0].depth).abs() <= self.tolerance {
                self.push(
                    FindingCode::DuplicateStationDepth,
                    Severity::Warning,
                    "two stations at the same depth".into(),
                    Some(pair[0].depth),
                );
            }
        }
    }

    fn check_intervals(&mut self, intervals: &[GeologyInterval]) {
        for iv in intervals {
            if !(iv.from.is_finite() && iv.to.is_finite()) {
                self.push(
                    FindingCode::NonFiniteValue,
                    Severity::Error,
                    format!("interval {} has a non-numeric bound", iv.code),
                    None,
                );
            } else if iv.from >= iv.to {
                self.push(
                    FindingCode::EmptyInterval,
                    Severity::Warning,
                    format!("interval {} runs from {} to {}", iv.code, iv.from, iv.to),
                    Some(iv.from),
                );
            }
        }

        if intervals.windows(2).any(|w| w[1].from < w[0].from) {
            self.push(
                FindingCode::UnorderedIntervals,
                Severity::Warning,
                "intervals are not in ascending depth order".into(),
                None,
            );
        }

        for (i, a) in intervals.iter().enumerate() {
            for b in &intervals[i + 1..] {
                if a.from < b.to && b.from < a.to && a.from < a.to && b.from < b.to {
                    let shared = a.from.max(b.from);
                    self.push(
                        FindingCode::OverlappingIntervals,
                        Severity::Warning,
                        format!("{} shadows {} from depth {}", a.code, b.code, shared),
                        Some(shared),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesurveyConfig;
    use std::collections::HashMap;

    type Row = HashMap<String, String>;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn collar(id: &str, depth: &str) -> Row {
        row(&[("HOLEID", id), ("EAST", "0"), ("NORTH", "0"), ("RL", "0"), ("DEPTH", depth)])
    }

    fn geology(id: &str, from: &str, to: &str, code: &str) -> Row {
        row(&[("HOLEID", id), ("FROM", from), ("TO", to), ("ABBRV", code)])
    }

    fn survey(id: &str, depth: &str) -> Row {
        row(&[("HOLEID", id), ("DEPTH", depth), ("AZIMUTH", "0"), ("DIP", "-60")])
    }

    fn audited(collars: &[Row], surveys: &[Row], geo: &[Row]) -> AuditReport {
        let mut store = SurveyStore::new();
        store.load_rows(collars, surveys, geo).unwrap();
        audit_store(&store)
    }

    #[test]
    fn test_clean_hole() {
        let report = audited(
            &[collar("A", "50")],
            &[survey("A", "0"), survey("A", "30")],
            &[geology("A", "0", "20", "OX"), geology("A", "20", "50", "FR")],
        );
        assert!(report.is_clean(), "{:?}", report.findings);
        assert_eq!(report.holes_checked, 1);
    }

    #[test]
    fn test_overlap_and_order_flagged() {
        let report = audited(
            &[collar("A", "50")],
            &[],
            &[geology("A", "10", "30", "FR"), geology("A", "0", "20", "OX")],
        );
        assert!(report.has_code(FindingCode::OverlappingIntervals));
        assert!(report.has_code(FindingCode::UnorderedIntervals));
        assert_eq!(report.errors().count(), 0);
    }

    #[test]
    fn test_station_problems_flagged() {
        let report = audited(
            &[collar("A", "50")],
            &[survey("A", "20"), survey("A", "20"), survey("A", "70")],
            &[],
        );
        assert!(report.has_code(FindingCode::DuplicateStationDepth));
        assert!(report.has_code(FindingCode::StationBeyondEndOfHole));
    }

    #[test]
    fn test_duplicate_depth_uses_store_tolerance() {
        let collars = [collar("A", "50")];
        let surveys = [survey("A", "20"), survey("A", "20.25")];

        let mut store = SurveyStore::new();
        store.load_rows(&collars, &surveys, &[]).unwrap();
        assert!(!audit_store(&store).has_code(FindingCode::DuplicateStationDepth));

        let mut coarse = SurveyStore::with_config(DesurveyConfig {
            tolerance: 0.5,
            ..DesurveyConfig::default()
        });
        coarse.load_rows(&collars, &surveys, &[]).unwrap();
        assert!(audit_store(&coarse).has_code(FindingCode::DuplicateStationDepth));
    }

    #[test]
    fn test_uncollared_and_nan_flagged() {
        let report = audited(
            &[collar("A", "oops")],
            &[survey("B", "10")],
            &[geology("A", "5", "5", "OX")],
        );
        assert!(report.for_hole("A").any(|f| f.code == FindingCode::NonFiniteValue));
        assert!(report.for_hole("A").any(|f| f.code == FindingCode::EmptyInterval));
        assert!(report.for_hole("B").any(|f| f.code == FindingCode::MissingCollar));
    }
}
