//! Finding codes, severities and the report returned by
//! [`audit_store`](super::audit_store).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of an audit finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// The affected hole or record cannot produce sensible geometry.
    Error,
    /// Loaded and usable, but probably not what the data author meant.
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingCode {
    /// Survey or geology rows exist for a hole with no collar.
    MissingCollar,
    /// A numeric field is NaN or infinite.
    NonFiniteValue,
    /// Collar depth below zero.
    NegativeDepth,
    /// Two stations share a depth; segment choice then depends on input order.
    DuplicateStationDepth,
    /// A station lies deeper than the collar's total depth.
    StationBeyondEndOfHole,
    /// `from >= to`; the interval can never match a depth.
    EmptyInterval,
    /// Interval `from` values are not ascending in input order.
    UnorderedIntervals,
    /// Two intervals share depths; the earlier one shadows the later.
    OverlappingIntervals,
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One data-quality observation about a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub hole_id: String,
    pub code: FindingCode,
    pub severity: Severity,
    pub message: String,
    /// The offending depth or value, when there is a single one.
    pub value: Option<f64>,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{}] {} {}: {}", sev, self.hole_id, self.code, self.message)?;
        if let Some(val) = self.value {
            write!(f, " value={val}")?;
        }
        Ok(())
    }
}

/// Everything found in one audit pass, ordered by hole id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub holes_checked: usize,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn for_hole<'a>(&'a self, hole_id: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.hole_id == hole_id)
    }

    pub fn has_code(&self, code: FindingCode) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }
}
