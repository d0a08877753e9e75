use crate::record::RowKind;

/// Errors from a bulk load. The store keeps its previous contents on failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("{kind} source failed at row {row}: {reason}")]
    SourceFailed {
        kind: RowKind,
        row: usize,
        reason: String,
    },
}

/// Errors from trajectory and geometry queries. None of them are fatal; the
/// geometry builders skip the affected item and carry on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesurveyError {
    #[error("no collar loaded for hole {hole_id}")]
    MissingCollar { hole_id: String },

    #[error("depth {depth} in hole {hole_id} does not resolve to a finite point")]
    UnresolvedDepth { hole_id: String, depth: f64 },

    #[error("interval {from}..{to} in hole {hole_id} resolved only {count} point(s)")]
    InsufficientIntervalPoints {
        hole_id: String,
        from: f64,
        to: f64,
        count: usize,
    },
}
