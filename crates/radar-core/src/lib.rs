//! Radar core
//!
//! Pure data model and policy for the minimap radar: zone catalog, geometry,
//! marker classification and aggregation, shared settings, and the runtime
//! plumbing (summary slot, paced worker, narration) that sits around the
//! OpenCV pipeline.

pub mod geometry;
pub mod markers;
pub mod runtime;
pub mod zones;

pub use geometry::{Homography, Point};
pub use markers::{FrameSummary, Marker, MarkerKind, ReportingBuckets};
pub use runtime::{Settings, SummarySlot};
pub use zones::{Zone, ZoneCatalog, ZoneError};
