//! Template-match hit boxes

use radar_core::Point;
use serde::{Deserialize, Serialize};

/// Template-sized box at a matched location with its correlation score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f64,
}

impl BBox {
    /// Create a new bounding box
    pub fn new(x: i32, y: i32, width: i32, height: i32, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
        }
    }

    /// Center point (top-left offset by half the size, rounded down)
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_uses_half_template_size() {
        let bbox = BBox::new(10, 20, 7, 4, 0.9);
        assert_eq!(bbox.center(), Point::new(13, 22));
    }
}
