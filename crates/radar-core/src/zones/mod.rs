//! Named zones of the reference map

pub mod catalog;

pub use catalog::ZoneCatalog;

use crate::geometry::{Point, Polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named polygonal region of the reference map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub polygon: Polygon,
}

impl Zone {
    pub fn new(name: impl Into<String>, polygon: Polygon) -> Self {
        Self {
            name: name.into(),
            polygon,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.polygon.contains(point)
    }
}

/// Errors raised while loading a zone definition resource
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("failed to read zone definitions from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("zone '{zone}': coordinate '{literal}' is not a valid pixel value")]
    Coordinate { zone: String, literal: String },

    #[error("no usable zone definitions found in {source_name}")]
    Empty { source_name: String },
}
