//! Tunables for loading and geometry generation.

use serde::{Deserialize, Serialize};

/// The geology code reported for depths outside every interval.
pub const UNKNOWN_CODE: &str = "UNK";

/// How a row with an unparsable required number is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumericPolicy {
    /// Keep the row; the bad field becomes NaN and propagates through queries.
    #[default]
    Lenient,
    /// Skip the row exactly like one with a missing field.
    Strict,
}

/// Configuration shared by the store and the geometry builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesurveyConfig {
    /// Lower bound on the spacing of fill samples inside an interval.
    pub min_fill_step: f64,
    /// Interval length is divided by this to get the preferred fill spacing.
    pub fill_divisions: u32,
    /// Factor applied to the vertical component of emitted geometry.
    pub vertical_exaggeration: f64,
    pub numeric_policy: NumericPolicy,
    pub unknown_code: String,
    /// Depths closer than this are treated as the same sample.
    pub tolerance: f64,
}

impl Default for DesurveyConfig {
    fn default() -> Self {
        Self {
            min_fill_step: 5.0,
            fill_divisions: 10,
            vertical_exaggeration: 1.0,
            numeric_policy: NumericPolicy::Lenient,
            unknown_code: UNKNOWN_CODE.to_string(),
            tolerance: 1e-9,
        }
    }
}

impl DesurveyConfig {
    /// Settings of the interactive 3D viewer: five-fold vertical exaggeration.
    pub fn viewer() -> Self {
        Self {
            vertical_exaggeration: 5.0,
            ..Self::default()
        }
    }

    /// Reject rows whose numbers do not parse.
    pub fn strict() -> Self {
        Self {
            numeric_policy: NumericPolicy::Strict,
            ..Self::default()
        }
    }

    /// Fill spacing for an interval of the given length.
    pub fn fill_step(&self, length: f64) -> f64 {
        let divisions = f64::from(self.fill_divisions.max(1));
        self.min_fill_step.max(length / divisions)
    }
}
