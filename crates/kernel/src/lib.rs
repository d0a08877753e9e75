//! Drillhole desurveying and geology-interval geometry.
//!
//! Load collars, survey stations and geology intervals into a
//! [`SurveyStore`], then ask it where a hole is at a given depth, which
//! geology code sits there, or for per-interval polylines to hand to a
//! renderer. All queries are read-only and the store is `Send + Sync`.

pub mod audit;
pub mod config;
pub mod error;
pub mod geology;
pub mod geometry;
pub mod model;
pub mod projector;
pub mod record;
pub mod segment;
pub mod store;
pub mod trajectory;

pub use audit::{audit_store, AuditReport, Finding, FindingCode, Severity};
pub use config::{DesurveyConfig, NumericPolicy, UNKNOWN_CODE};
pub use error::{DesurveyError, LoadError};
pub use geometry::bounds::BoundingBox;
pub use geometry::point::Point3d;
pub use geometry::vector::Vec3;
pub use model::{Collar, GeologyInterval, Hole, SurveyStation};
pub use projector::project;
pub use record::{Record, RowKind};
pub use segment::{HoleGeometry, IntervalGeometry, SkippedInterval};
pub use store::{LoadSummary, SurveyStore};
pub use trajectory::TrajectoryWalker;
