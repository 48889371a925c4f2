//! Marker detector: color passes for players, template pass for the device

use super::color::{band_mask, contour_centroids, union_mask};
use super::config::DetectionConfig;
use super::template::TemplateMatcher;
use crate::assets::DetectionTemplate;
use crate::utils::ImageUtils;
use crate::Result;
use opencv::core::Mat;
use radar_core::Marker;
use radar_core::markers::MarkerKind;
use tracing::{debug, trace, warn};

/// Finds every marker family in one BGR minimap frame
pub struct MarkerDetector {
    config: DetectionConfig,
    matcher: TemplateMatcher,
}

impl MarkerDetector {
    pub fn new(config: DetectionConfig) -> Self {
        let matcher = TemplateMatcher::new(config.template_threshold);
        Self { config, matcher }
    }

    /// One marker per enemy-colored blob
    pub fn detect_enemies(&self, frame: &Mat) -> Result<Vec<Marker>> {
        let mask = band_mask(frame, &self.config.enemy)?;
        Ok(to_markers(MarkerKind::Enemy, contour_centroids(&mask)?))
    }

    /// One marker per blob of any teammate color
    pub fn detect_teammates(&self, frame: &Mat) -> Result<Vec<Marker>> {
        let mask = union_mask(frame, &self.config.teammates)?;
        Ok(to_markers(MarkerKind::Teammate, contour_centroids(&mask)?))
    }

    /// One marker per template hit, at the center of the matched box
    pub fn detect_objects(&self, frame: &Mat, template: &DetectionTemplate) -> Result<Vec<Marker>> {
        let gray = ImageUtils::to_grayscale(frame)?;
        let hits = self.matcher.match_all(&gray, template)?;
        for hit in &hits {
            trace!(x = hit.x, y = hit.y, score = hit.confidence, "Template hit");
        }
        Ok(to_markers(
            MarkerKind::DetectedObject,
            hits.iter().map(|hit| hit.center()),
        ))
    }

    /// All families for one frame.
    ///
    /// A failing family is logged and contributes nothing; the others still
    /// report.
    pub fn detect(&self, frame: &Mat, template: &DetectionTemplate) -> Vec<Marker> {
        #[cfg(feature = "parallel")]
        let ((enemies, teammates), objects) = rayon::join(
            || (self.detect_enemies(frame), self.detect_teammates(frame)),
            || self.detect_objects(frame, template),
        );

        #[cfg(not(feature = "parallel"))]
        let (enemies, teammates, objects) = (
            self.detect_enemies(frame),
            self.detect_teammates(frame),
            self.detect_objects(frame, template),
        );

        let mut markers = Vec::new();
        for (kind, found) in [
            (MarkerKind::Enemy, enemies),
            (MarkerKind::Teammate, teammates),
            (MarkerKind::DetectedObject, objects),
        ] {
            match found {
                Ok(found) => {
                    debug!(%kind, count = found.len(), "Detected markers");
                    markers.extend(found);
                }
                Err(e) => warn!(%kind, "Detection failed: {e:#}"),
            }
        }

        markers
    }
}

fn to_markers(
    kind: MarkerKind,
    points: impl IntoIterator<Item = radar_core::Point>,
) -> Vec<Marker> {
    points.into_iter().map(|p| Marker::new(kind, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ColorBand;
    use opencv::{
        core::{Rect, Scalar, CV_8UC1, CV_8UC3},
        imgproc,
        prelude::*,
    };

    fn fill(frame: &mut Mat, rect: Rect, [b, g, r]: [u8; 3]) -> Result<()> {
        let color = Scalar::new(f64::from(b), f64::from(g), f64::from(r), 0.0);
        imgproc::rectangle(frame, rect, color, imgproc::FILLED, imgproc::LINE_8, 0)?;
        Ok(())
    }

    fn flat_template() -> Result<DetectionTemplate> {
        // Half-lit block; only the color passes are asserted against it
        let mut gray = Mat::new_rows_cols_with_default(10, 10, CV_8UC1, Scalar::all(0.0))?;
        imgproc::rectangle(
            &mut gray,
            Rect::new(0, 0, 5, 10),
            Scalar::all(200.0),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )?;
        DetectionTemplate::with_gray(gray)
    }

    #[test]
    fn test_detects_both_color_families() -> Result<()> {
        let mut frame = Mat::new_rows_cols_with_default(100, 100, CV_8UC3, Scalar::all(0.0))?;
        fill(&mut frame, Rect::new(10, 10, 5, 5), [23, 22, 223])?;
        fill(&mut frame, Rect::new(60, 60, 5, 5), [125, 154, 0])?;
        fill(&mut frame, Rect::new(80, 20, 5, 5), [146, 43, 183])?;

        let detector = MarkerDetector::new(DetectionConfig::default());

        let enemies = detector.detect_enemies(&frame)?;
        assert_eq!(enemies, vec![Marker::enemy(12, 12)]);

        let mut teammates = detector.detect_teammates(&frame)?;
        teammates.sort_by_key(|m| (m.point.x, m.point.y));
        assert_eq!(teammates, vec![Marker::teammate(62, 62), Marker::teammate(82, 22)]);
        Ok(())
    }

    #[test]
    fn test_enemy_tolerance_rejects_far_colors() -> Result<()> {
        let mut frame = Mat::new_rows_cols_with_default(40, 40, CV_8UC3, Scalar::all(0.0))?;
        // Red channel 40 away from the reference
        fill(&mut frame, Rect::new(10, 10, 5, 5), [23, 22, 183])?;

        let detector = MarkerDetector::new(DetectionConfig::default());
        assert!(detector.detect_enemies(&frame)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_teammate_palette() -> Result<()> {
        let mut frame = Mat::new_rows_cols_with_default(40, 40, CV_8UC3, Scalar::all(0.0))?;
        fill(&mut frame, Rect::new(10, 10, 5, 5), [125, 154, 0])?;

        let config = DetectionConfig {
            teammates: Vec::new(),
            ..DetectionConfig::default()
        };
        assert!(MarkerDetector::new(config).detect_teammates(&frame)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_detect_collects_all_families() -> Result<()> {
        let mut frame = Mat::new_rows_cols_with_default(100, 100, CV_8UC3, Scalar::all(0.0))?;
        fill(&mut frame, Rect::new(10, 10, 5, 5), [23, 22, 223])?;
        fill(&mut frame, Rect::new(60, 60, 5, 5), [125, 154, 0])?;

        let config = DetectionConfig {
            enemy: ColorBand::new([23, 22, 223], 15),
            ..DetectionConfig::default()
        };
        let markers = MarkerDetector::new(config).detect(&frame, &flat_template()?);

        assert!(markers.contains(&Marker::enemy(12, 12)));
        assert!(markers.contains(&Marker::teammate(62, 62)));
        Ok(())
    }
}
