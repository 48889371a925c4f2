//! Geometry primitives shared by the classifier and the CV pipeline

pub mod homography;
pub mod polygon;

pub use homography::Homography;
pub use polygon::Polygon;

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate, either in live-capture or reference-map space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}
