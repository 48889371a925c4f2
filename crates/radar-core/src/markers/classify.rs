//! Zone classification of markers

use super::Marker;
use crate::geometry::{Homography, Point};
use crate::zones::ZoneCatalog;

/// Map a live-capture point into reference-map space.
///
/// Without a homography the live point is used as-is (degraded mode). A
/// projection that degenerates yields `None`.
pub fn reference_point(point: Point, homography: Option<&Homography>) -> Option<Point> {
    match homography {
        Some(h) => h.project(point),
        None => Some(point),
    }
}

/// Resolve the zone name for a marker. Pure: same inputs, same answer.
pub fn classify(
    marker: &Marker,
    homography: Option<&Homography>,
    catalog: &ZoneCatalog,
) -> Option<String> {
    let point = reference_point(marker.point, homography)?;
    catalog.name_at(point).map(str::to_owned)
}

/// Fill in the zone of every marker in place.
pub fn classify_all(markers: &mut [Marker], homography: Option<&Homography>, catalog: &ZoneCatalog) {
    for marker in markers {
        marker.zone = classify(marker, homography, catalog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::zones::Zone;

    fn catalog() -> ZoneCatalog {
        ZoneCatalog::from_zones([
            Zone::new("A", Polygon::from(vec![(0, 0), (10, 0), (10, 10), (0, 10)])),
            Zone::new("B", Polygon::from(vec![(100, 100), (110, 100), (110, 110), (100, 110)])),
        ])
    }

    #[test]
    fn test_without_homography_uses_live_point() {
        let catalog = catalog();
        assert_eq!(classify(&Marker::enemy(5, 5), None, &catalog).as_deref(), Some("A"));
        assert_eq!(classify(&Marker::enemy(50, 50), None, &catalog), None);
    }

    #[test]
    fn test_homography_moves_point_into_other_zone() {
        let catalog = catalog();
        let shift = Homography::new([[1.0, 0.0, 100.0], [0.0, 1.0, 100.0], [0.0, 0.0, 1.0]]);
        assert_eq!(
            classify(&Marker::teammate(5, 5), Some(&shift), &catalog).as_deref(),
            Some("B")
        );
    }

    #[test]
    fn test_degenerate_projection_is_unresolved() {
        let catalog = catalog();
        let degenerate = Homography::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);
        assert_eq!(classify(&Marker::enemy(5, 5), Some(&degenerate), &catalog), None);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let catalog = catalog();
        let h = Homography::new([[0.5, 0.0, 2.0], [0.0, 0.5, 2.0], [0.0, 0.0, 1.0]]);
        let marker = Marker::object(8, 8);
        let first = classify(&marker, Some(&h), &catalog);
        for _ in 0..10 {
            assert_eq!(classify(&marker, Some(&h), &catalog), first);
        }

        let mut markers = vec![marker.clone(), marker];
        classify_all(&mut markers, Some(&h), &catalog);
        let once = markers.clone();
        classify_all(&mut markers, Some(&h), &catalog);
        assert_eq!(markers, once);
    }
}
