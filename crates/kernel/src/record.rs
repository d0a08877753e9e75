//! Loosely-typed input rows.
//!
//! Callers hand the store whatever their parser produced (header-keyed CSV
//! rows, JSON objects); the store only needs string access by column name.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const HOLEID: &str = "HOLEID";
pub const EAST: &str = "EAST";
pub const NORTH: &str = "NORTH";
pub const RL: &str = "RL";
pub const DEPTH: &str = "DEPTH";
pub const AZIMUTH: &str = "AZIMUTH";
pub const DIP: &str = "DIP";
pub const FROM: &str = "FROM";
pub const TO: &str = "TO";
pub const ABBRV: &str = "ABBRV";

/// Which of the three row sources a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKind {
    Collar,
    Survey,
    Geology,
}

impl RowKind {
    /// Column names that must be present and non-empty.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            RowKind::Collar => &[HOLEID, EAST, NORTH, RL, DEPTH],
            RowKind::Survey => &[HOLEID, DEPTH, AZIMUTH, DIP],
            RowKind::Geology => &[HOLEID, FROM, TO, ABBRV],
        }
    }
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RowKind::Collar => "collar",
            RowKind::Survey => "survey",
            RowKind::Geology => "geology",
        };
        f.write_str(name)
    }
}

/// String access to a row by (case-sensitive) column name.
pub trait Record {
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;

    /// The field if present and not blank.
    fn non_empty(&self, key: &str) -> Option<Cow<'_, str>> {
        self.field(key).filter(|v| !v.trim().is_empty())
    }

    fn has_required(&self, kind: RowKind) -> bool {
        kind.required_fields()
            .iter()
            .all(|key| self.non_empty(key).is_some())
    }
}

impl Record for HashMap<String, String> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Record for serde_json::Map<String, Value> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.get(key)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).field(key)
    }
}

/// Parse a numeric field, yielding NaN when it does not parse.
pub fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let r = row(&[
            ("HOLEID", "H1"),
            ("EAST", ""),
            ("NORTH", "1"),
            ("RL", "1"),
            ("DEPTH", "1"),
        ]);
        assert!(!r.has_required(RowKind::Collar));
        assert!(r.non_empty("EAST").is_none());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let r = row(&[("holeid", "H1")]);
        assert!(r.field(HOLEID).is_none());
    }

    #[test]
    fn test_json_numbers_are_stringified() {
        let value = serde_json::json!({"HOLEID": "H1", "FROM": 0, "TO": 12.5, "ABBRV": "ox"});
        let map = value.as_object().unwrap();
        assert!(map.has_required(RowKind::Geology));
        assert_eq!(parse_number(&map.field(TO).unwrap()), 12.5);
    }

    #[test]
    fn test_parse_number_yields_nan_on_garbage() {
        assert!(parse_number("abc").is_nan());
        assert_eq!(parse_number(" 42.5 "), 42.5);
    }
}
