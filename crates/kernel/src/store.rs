//! The survey store: collars, survey stations and geology intervals keyed by
//! hole id.
//!
//! A load consumes all three row sources into a staging map and only replaces
//! the current contents once every source has been read to the end, so a
//! failed reload leaves the previous dataset intact.

use std::collections::HashMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{DesurveyConfig, NumericPolicy};
use crate::error::LoadError;
use crate::geometry::bounds::BoundingBox;
use crate::model::{normalize_code, Collar, GeologyInterval, Hole, SurveyStation};
use crate::record::{self, parse_number, Record, RowKind};

/// Counts gathered during one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub collar_rows: usize,
    pub survey_rows: usize,
    pub geology_rows: usize,
    /// Rows dropped for missing (or, under the strict policy, unparsable) fields.
    pub skipped_rows: usize,
    pub collars: usize,
    pub surveyed_holes: usize,
    pub geology_holes: usize,
    pub stations: usize,
    pub intervals: usize,
    /// Collared holes with at least one survey station.
    pub holes_with_survey: usize,
    /// Collared holes that will desurvey as vertical.
    pub holes_without_survey: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SurveyStore {
    holes: HashMap<String, Hole>,
    config: DesurveyConfig,
}

impl SurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DesurveyConfig) -> Self {
        Self {
            holes: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &DesurveyConfig {
        &self.config
    }

    /// Replace the store contents from three row sources.
    ///
    /// Rows lacking a required field are skipped and counted. The first source
    /// error aborts the load and leaves the current contents unchanged.
    #[instrument(skip_all)]
    pub fn load<R, E, C, S, G>(
        &mut self,
        collars: C,
        surveys: S,
        geology: G,
    ) -> Result<LoadSummary, LoadError>
    where
        R: Record,
        E: Display,
        C: IntoIterator<Item = Result<R, E>>,
        S: IntoIterator<Item = Result<R, E>>,
        G: IntoIterator<Item = Result<R, E>>,
    {
        let mut staging = Staging {
            holes: HashMap::new(),
            summary: LoadSummary::default(),
            policy: self.config.numeric_policy,
        };

        staging.ingest(RowKind::Collar, collars)?;
        staging.ingest(RowKind::Survey, surveys)?;
        staging.ingest(RowKind::Geology, geology)?;

        let summary = staging.finish();
        self.holes = staging.holes;

        info!(
            collars = summary.collars,
            surveyed_holes = summary.surveyed_holes,
            geology_holes = summary.geology_holes,
            stations = summary.stations,
            intervals = summary.intervals,
            skipped_rows = summary.skipped_rows,
            holes_with_survey = summary.holes_with_survey,
            holes_without_survey = summary.holes_without_survey,
            "drillhole data loaded"
        );
        Ok(summary)
    }

    /// [`load`](Self::load) for rows that are already in memory.
    pub fn load_rows<R: Record>(
        &mut self,
        collars: &[R],
        surveys: &[R],
        geology: &[R],
    ) -> Result<LoadSummary, LoadError> {
        fn infallible<R>(rows: &[R]) -> impl Iterator<Item = Result<&R, std::convert::Infallible>> {
            rows.iter().map(Ok)
        }
        self.load(infallible(collars), infallible(surveys), infallible(geology))
    }

    pub fn hole(&self, hole_id: &str) -> Option<&Hole> {
        self.holes.get(hole_id)
    }

    pub fn collar(&self, hole_id: &str) -> Option<&Collar> {
        self.holes.get(hole_id)?.collar.as_ref()
    }

    /// Stations sorted by depth; empty for unknown holes.
    pub fn stations(&self, hole_id: &str) -> &[SurveyStation] {
        self.holes
            .get(hole_id)
            .map(|h| h.stations.as_slice())
            .unwrap_or_default()
    }

    /// Intervals in input order; empty for unknown holes.
    pub fn intervals(&self, hole_id: &str) -> &[GeologyInterval] {
        self.holes
            .get(hole_id)
            .map(|h| h.intervals.as_slice())
            .unwrap_or_default()
    }

    /// Ids of every hole with a collar, in no particular order.
    pub fn all_hole_ids(&self) -> impl Iterator<Item = &str> {
        self.holes
            .iter()
            .filter(|(_, h)| h.collar.is_some())
            .map(|(id, _)| id.as_str())
    }

    /// Ids that have survey or geology rows but no collar.
    pub fn uncollared_hole_ids(&self) -> impl Iterator<Item = &str> {
        self.holes
            .iter()
            .filter(|(_, h)| h.collar.is_none())
            .map(|(id, _)| id.as_str())
    }

    /// Every hole, collared or not, in no particular order.
    pub fn holes(&self) -> impl Iterator<Item = (&str, &Hole)> {
        self.holes.iter().map(|(id, h)| (id.as_str(), h))
    }

    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }

    /// Box around all collar origins in engine space.
    pub fn collar_extent(&self) -> Option<BoundingBox> {
        let origins: Vec<_> = self
            .holes
            .values()
            .filter_map(|h| h.collar.as_ref().map(Collar::origin))
            .collect();
        BoundingBox::from_points(&origins)
    }
}

struct Staging {
    holes: HashMap<String, Hole>,
    summary: LoadSummary,
    policy: NumericPolicy,
}

impl Staging {
    fn ingest<R, E, I>(&mut self, kind: RowKind, rows: I) -> Result<(), LoadError>
    where
        R: Record,
        E: Display,
        I: IntoIterator<Item = Result<R, E>>,
    {
        for (index, row) in rows.into_iter().enumerate() {
            let row = row.map_err(|e| LoadError::SourceFailed {
                kind,
                row: index,
                reason: e.to_string(),
            })?;
            match kind {
                RowKind::Collar => self.summary.collar_rows += 1,
                RowKind::Survey => self.summary.survey_rows += 1,
                RowKind::Geology => self.summary.geology_rows += 1,
            }
            if !self.accept(kind, &row) {
                debug!(%kind, row = index, "skipping incomplete row");
                self.summary.skipped_rows += 1;
            }
        }
        Ok(())
    }

    fn number<R: Record>(&self, row: &R, key: &str) -> Option<f64> {
        let value = parse_number(&row.non_empty(key)?);
        match self.policy {
            NumericPolicy::Strict if value.is_nan() => None,
            _ => Some(value),
        }
    }

    fn accept<R: Record>(&mut self, kind: RowKind, row: &R) -> bool {
        if !row.has_required(kind) {
            return false;
        }
        let Some(hole_id) = row.non_empty(record::HOLEID) else {
            return false;
        };
        match kind {
            RowKind::Collar => {
                let (Some(east), Some(north), Some(rl), Some(depth)) = (
                    self.number(row, record::EAST),
                    self.number(row, record::NORTH),
                    self.number(row, record::RL),
                    self.number(row, record::DEPTH),
                ) else {
                    return false;
                };
                let hole = self.holes.entry(hole_id.into_owned()).or_default();
                // Repeated collar rows: the last one wins.
                hole.collar = Some(Collar {
                    east,
                    north,
                    rl,
                    depth,
                });
            }
            RowKind::Survey => {
                let (Some(depth), Some(azimuth), Some(dip)) = (
                    self.number(row, record::DEPTH),
                    self.number(row, record::AZIMUTH),
                    self.number(row, record::DIP),
                ) else {
                    return false;
                };
                self.holes
                    .entry(hole_id.into_owned())
                    .or_default()
                    .stations
                    .push(SurveyStation {
                        depth,
                        azimuth,
                        dip,
                    });
            }
            RowKind::Geology => {
                let (Some(from), Some(to), Some(code)) = (
                    self.number(row, record::FROM),
                    self.number(row, record::TO),
                    row.non_empty(record::ABBRV),
                ) else {
                    return false;
                };
                self.holes
                    .entry(hole_id.into_owned())
                    .or_default()
                    .intervals
                    .push(GeologyInterval {
                        from,
                        to,
                        code: normalize_code(&code),
                    });
            }
        }
        true
    }

    /// Sort stations and tally the summary.
    fn finish(&mut self) -> LoadSummary {
        let summary = &mut self.summary;
        for hole in self.holes.values_mut() {
            hole.stations.sort_by(|a, b| a.depth.total_cmp(&b.depth));

            summary.stations += hole.stations.len();
            summary.intervals += hole.intervals.len();
            if !hole.stations.is_empty() {
                summary.surveyed_holes += 1;
            }
            if !hole.intervals.is_empty() {
                summary.geology_holes += 1;
            }
            if hole.collar.is_some() {
                summary.collars += 1;
                if hole.stations.is_empty() {
                    summary.holes_without_survey += 1;
                } else {
                    summary.holes_with_survey += 1;
                }
            }
        }
        *summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Row = HashMap<String, String>;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn collar_row(id: &str, east: &str) -> Row {
        row(&[
            ("HOLEID", id),
            ("EAST", east),
            ("NORTH", "2000"),
            ("RL", "500"),
            ("DEPTH", "50"),
        ])
    }

    fn survey_row(id: &str, depth: &str) -> Row {
        row(&[("HOLEID", id), ("DEPTH", depth), ("AZIMUTH", "0"), ("DIP", "-90")])
    }

    #[test]
    fn test_incomplete_collar_row_is_skipped() {
        let mut store = SurveyStore::new();
        let summary = store
            .load_rows(&[collar_row("H1", "")], &[], &[])
            .unwrap();
        assert_eq!(summary.skipped_rows, 1);
        assert_eq!(store.all_hole_ids().count(), 0);
    }

    #[test]
    fn test_stations_sorted_after_load() {
        let mut store = SurveyStore::new();
        store
            .load_rows(
                &[collar_row("H1", "1000")],
                &[survey_row("H1", "30"), survey_row("H1", "0"), survey_row("H1", "10")],
                &[],
            )
            .unwrap();
        let depths: Vec<f64> = store.stations("H1").iter().map(|s| s.depth).collect();
        assert_eq!(depths, vec![0.0, 10.0, 30.0]);
    }

    #[test]
    fn test_lenient_policy_admits_nan() {
        let mut store = SurveyStore::new();
        store
            .load_rows(&[collar_row("H1", "abc")], &[], &[])
            .unwrap();
        assert!(store.collar("H1").unwrap().east.is_nan());
    }

    #[test]
    fn test_strict_policy_rejects_unparsable() {
        let mut store = SurveyStore::with_config(DesurveyConfig::strict());
        let summary = store
            .load_rows(&[collar_row("H1", "abc"), collar_row("H2", "1")], &[], &[])
            .unwrap();
        assert_eq!(summary.skipped_rows, 1);
        assert!(store.collar("H1").is_none());
        assert!(store.collar("H2").is_some());
    }

    #[test]
    fn test_geology_code_normalized() {
        let mut store = SurveyStore::new();
        store
            .load_rows(
                &[collar_row("H1", "0")],
                &[],
                &[row(&[("HOLEID", "H1"), ("FROM", "0"), ("TO", "5"), ("ABBRV", " ox ")])],
            )
            .unwrap();
        assert_eq!(store.intervals("H1")[0].code, "OX");
    }

    #[test]
    fn test_failed_reload_keeps_previous_contents() {
        let mut store = SurveyStore::new();
        store.load_rows(&[collar_row("H1", "0")], &[], &[]).unwrap();

        let collars: Vec<Result<Row, String>> = vec![Ok(collar_row("H2", "0"))];
        let surveys: Vec<Result<Row, String>> = vec![Err("truncated file".into())];
        let err = store
            .load(collars, surveys, Vec::<Result<Row, String>>::new())
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::SourceFailed {
                kind: RowKind::Survey,
                row: 0,
                ..
            }
        ));
        assert!(store.collar("H1").is_some());
        assert!(store.collar("H2").is_none());
    }

    #[test]
    fn test_survey_without_collar_is_uncollared() {
        let mut store = SurveyStore::new();
        let summary = store
            .load_rows(&[], &[survey_row("ORPHAN", "10")], &[])
            .unwrap();
        assert_eq!(summary.surveyed_holes, 1);
        assert_eq!(summary.collars, 0);
        assert_eq!(store.uncollared_hole_ids().collect::<Vec<_>>(), vec!["ORPHAN"]);
        assert_eq!(store.all_hole_ids().count(), 0);
    }

    #[test]
    fn test_summary_counts_surveyed_and_vertical_holes() {
        let mut store = SurveyStore::new();
        let summary = store
            .load_rows(
                &[collar_row("A", "0"), collar_row("B", "10")],
                &[survey_row("A", "0"), survey_row("A", "20")],
                &[],
            )
            .unwrap();
        assert_eq!(summary.collars, 2);
        assert_eq!(summary.stations, 2);
        assert_eq!(summary.holes_with_survey, 1);
        assert_eq!(summary.holes_without_survey, 1);
    }

    #[test]
    fn test_collar_extent() {
        let mut store = SurveyStore::new();
        assert!(store.collar_extent().is_none());
        store
            .load_rows(&[collar_row("A", "0"), collar_row("B", "100")], &[], &[])
            .unwrap();
        let bb = store.collar_extent().unwrap();
        assert_eq!(bb.min.x, 0.0);
        assert_eq!(bb.max.x, 100.0);
        assert_eq!(bb.min.y, -500.0);
    }
}
