//! Integer polygons in reference-map pixel space

use super::Point;
use serde::{Deserialize, Serialize};

/// Closed polygon; the last vertex connects back to the first.
///
/// Not required to be convex. Membership counts boundary points as inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Even-odd membership test with exact integer arithmetic.
    pub fn contains(&self, point: Point) -> bool {
        let n = self.vertices.len();
        if n == 0 {
            return false;
        }

        let (px, py) = (i64::from(point.x), i64::from(point.y));
        let mut inside = false;
        let mut j = n - 1;

        for i in 0..n {
            let a = self.vertices[j];
            let b = self.vertices[i];
            if on_segment(a, b, point) {
                return true;
            }

            let (ax, ay) = (i64::from(a.x), i64::from(a.y));
            let (bx, by) = (i64::from(b.x), i64::from(b.y));

            if (ay > py) != (by > py) {
                // Compare px against the edge's x at height py without dividing.
                let lhs = (px - ax) * (by - ay);
                let rhs = (py - ay) * (bx - ax);
                let crosses = if by > ay { lhs < rhs } else { lhs > rhs };
                if crosses {
                    inside = !inside;
                }
            }
            j = i;
        }

        inside
    }
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let (ax, ay) = (i64::from(a.x), i64::from(a.y));
    let (bx, by) = (i64::from(b.x), i64::from(b.y));
    let (px, py) = (i64::from(p.x), i64::from(p.y));

    let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
    cross == 0
        && px >= ax.min(bx)
        && px <= ax.max(bx)
        && py >= ay.min(by)
        && py <= ay.max(by)
}

impl From<Vec<(i32, i32)>> for Polygon {
    fn from(points: Vec<(i32, i32)>) -> Self {
        Self::new(points.into_iter().map(Point::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::from(vec![(0, 0), (10, 0), (10, 10), (0, 10)])
    }

    /// U shape opening upwards: the notch between x=4..6, y=4..10 is outside.
    fn u_shape() -> Polygon {
        Polygon::from(vec![
            (0, 0),
            (10, 0),
            (10, 10),
            (6, 10),
            (6, 4),
            (4, 4),
            (4, 10),
            (0, 10),
        ])
    }

    #[test]
    fn test_interior_and_exterior() {
        let poly = square();
        assert!(poly.contains(Point::new(5, 5)));
        assert!(poly.contains(Point::new(1, 9)));
        assert!(!poly.contains(Point::new(11, 5)));
        assert!(!poly.contains(Point::new(-1, -1)));
        assert!(!poly.contains(Point::new(5, 20)));
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let poly = square();
        assert!(poly.contains(Point::new(0, 0)));
        assert!(poly.contains(Point::new(10, 5)));
        assert!(poly.contains(Point::new(5, 10)));
        assert!(poly.contains(Point::new(0, 7)));
    }

    #[test]
    fn test_concave_notch_is_outside() {
        let poly = u_shape();
        assert!(!poly.contains(Point::new(5, 8)));
        assert!(poly.contains(Point::new(2, 8)));
        assert!(poly.contains(Point::new(8, 8)));
        assert!(poly.contains(Point::new(5, 2)));
        // bottom of the notch is an edge
        assert!(poly.contains(Point::new(5, 4)));
    }

    #[test]
    fn test_diagonal_edge() {
        let triangle = Polygon::from(vec![(0, 0), (10, 0), (0, 10)]);
        assert!(triangle.contains(Point::new(5, 5)));
        assert!(triangle.contains(Point::new(2, 2)));
        assert!(!triangle.contains(Point::new(6, 6)));
    }

    #[test]
    fn test_empty_polygon_contains_nothing() {
        assert!(!Polygon::new(Vec::new()).contains(Point::new(0, 0)));
    }
}
