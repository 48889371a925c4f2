//! Per-frame markers and their reduction into a frame summary

pub mod aggregate;
pub mod classify;

pub use aggregate::{BucketCount, FrameSummary, ReportingBuckets, aggregate};
pub use classify::{classify, classify_all};

use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a marker was detected as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    Enemy,
    Teammate,
    /// Template hit for the planted device icon
    DetectedObject,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MarkerKind::Enemy => "enemy",
            MarkerKind::Teammate => "teammate",
            MarkerKind::DetectedObject => "object",
        };
        f.write_str(label)
    }
}

/// One detection in one cycle. Never outlives the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Pixel position in the live capture
    pub point: Point,
    /// Filled in by the classifier
    pub zone: Option<String>,
}

impl Marker {
    pub fn new(kind: MarkerKind, point: Point) -> Self {
        Self {
            kind,
            point,
            zone: None,
        }
    }

    pub fn enemy(x: i32, y: i32) -> Self {
        Self::new(MarkerKind::Enemy, Point::new(x, y))
    }

    pub fn teammate(x: i32, y: i32) -> Self {
        Self::new(MarkerKind::Teammate, Point::new(x, y))
    }

    pub fn object(x: i32, y: i32) -> Self {
        Self::new(MarkerKind::DetectedObject, Point::new(x, y))
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}
