//! 3x3 projective transform from live-capture pixels to reference-map pixels

use super::Point;
use serde::{Deserialize, Serialize};

/// Row-major 3x3 homography.
///
/// Computed fresh every cycle by the registration engine; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    pub m: [[f64; 3]; 3],
}

impl Homography {
    pub const fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub const fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Apply the transform to a floating-point point.
    ///
    /// Returns `None` when the projective denominator vanishes or the result
    /// is not finite.
    pub fn apply(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let m = &self.m;
        let w = m[2][0] * x + m[2][1] * y + m[2][2];
        if w.abs() <= f64::from(f32::EPSILON) {
            return None;
        }
        let u = (m[0][0] * x + m[0][1] * y + m[0][2]) / w;
        let v = (m[1][0] * x + m[1][1] * y + m[1][2]) / w;
        (u.is_finite() && v.is_finite()).then_some((u, v))
    }

    /// Project an integer pixel and truncate the result toward zero.
    pub fn project(&self, point: Point) -> Option<Point> {
        let (u, v) = self.apply(f64::from(point.x), f64::from(point.y))?;
        Some(Point::new(u.trunc() as i32, v.trunc() as i32))
    }
}

impl Default for Homography {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_projection() {
        let h = Homography::identity();
        assert_eq!(h.project(Point::new(12, 34)), Some(Point::new(12, 34)));
    }

    #[test]
    fn test_scale_and_translate_truncates() {
        // x' = 1.5x + 10, y' = 0.5y - 3
        let h = Homography::new([[1.5, 0.0, 10.0], [0.0, 0.5, -3.0], [0.0, 0.0, 1.0]]);
        assert_eq!(h.project(Point::new(3, 5)), Some(Point::new(14, 0)));
        let (u, v) = h.apply(3.0, 5.0).unwrap();
        assert!((u - 14.5).abs() < 1e-12);
        assert!((v + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_projective_division() {
        let h = Homography::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]]);
        assert_eq!(h.project(Point::new(10, 20)), Some(Point::new(5, 10)));
    }

    #[test]
    fn test_degenerate_denominator() {
        let h = Homography::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);
        assert_eq!(h.project(Point::new(1, 1)), None);
    }
}
