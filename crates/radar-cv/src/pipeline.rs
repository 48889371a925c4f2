//! One radar cycle: capture, detect, register, classify, aggregate

use crate::assets::{AssetLoader, MapAssets};
use crate::config::RadarConfig;
use crate::detection::MarkerDetector;
use crate::registration::RegistrationEngine;
use crate::traits::FrameSource;
use crate::Result;
use opencv::core::Mat;
use radar_core::markers::{aggregate, classify_all};
use radar_core::{FrameSummary, ReportingBuckets};
use std::path::Path;
use tracing::{debug, warn};

/// Owns everything a cycle needs. Assets are read-only after construction.
pub struct MinimapPipeline {
    assets: MapAssets,
    detector: MarkerDetector,
    registration: RegistrationEngine,
    buckets: ReportingBuckets,
}

impl MinimapPipeline {
    /// Load assets from `asset_dir` and build the pipeline.
    ///
    /// The reference map is featurized with the registration engine's own
    /// extractor so live and reference keypoints share parameters.
    pub fn load<P: AsRef<Path>>(config: &RadarConfig, asset_dir: P) -> Result<Self> {
        let mut registration = RegistrationEngine::new(config.registration.clone())?;
        let loader = AssetLoader::new(asset_dir, config.assets.clone());
        let assets = loader.load(registration.extractor_mut())?;

        Ok(Self::from_parts(
            assets,
            MarkerDetector::new(config.detection.clone()),
            registration,
            config.buckets.clone(),
        ))
    }

    pub fn from_parts(
        assets: MapAssets,
        detector: MarkerDetector,
        registration: RegistrationEngine,
        buckets: ReportingBuckets,
    ) -> Self {
        Self {
            assets,
            detector,
            registration,
            buckets,
        }
    }

    /// Summarize one BGR frame.
    ///
    /// Without a homography the raw frame coordinates are looked up in the
    /// catalog directly.
    pub fn process(&mut self, frame: &Mat) -> FrameSummary {
        let mut markers = self.detector.detect(frame, &self.assets.template);
        let homography = self.registration.register(frame, &self.assets.reference);
        if homography.is_none() {
            debug!("No homography this cycle, classifying in frame coordinates");
        }

        classify_all(&mut markers, homography.as_ref(), &self.assets.zones);
        let summary = aggregate(&markers, &self.buckets);

        debug!(
            markers = markers.len(),
            teammates = summary.total_teammates(),
            enemies = %summary.enemy_text(),
            objects = %summary.object_text(),
            "Cycle summary"
        );
        summary
    }

    /// Grab a frame and summarize it. A failed grab yields an empty summary.
    pub fn cycle<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> FrameSummary {
        match source.grab() {
            Ok(frame) => self.process(&frame),
            Err(e) => {
                warn!("Capture failed, skipping cycle: {:#}", e);
                FrameSummary::empty(&self.buckets)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{DetectionTemplate, ReferenceMap};
    use crate::detection::DetectionConfig;
    use crate::registration::RegistrationConfig;
    use anyhow::anyhow;
    use opencv::{
        core::{Rect, Scalar, CV_8UC1, CV_8UC3},
        imgproc,
        prelude::*,
    };
    use radar_core::ZoneCatalog;

    const ZONES: &str = "A平台: (0,0),(50,0),(50,50),(0,50)\nB点: (50,0),(100,0),(100,50),(50,50)\n";

    fn pipeline() -> Result<MinimapPipeline> {
        let mut registration = RegistrationEngine::new(RegistrationConfig::default())?;
        // Featureless reference: registration always fails, frame coordinates are used
        let blank = Mat::new_rows_cols_with_default(100, 100, CV_8UC3, Scalar::all(0.0))?;
        let reference = ReferenceMap::build(blank, registration.extractor_mut())?;

        // Checkerboard: uncorrelated with the solid marker blobs
        let mut gray = Mat::new_rows_cols_with_default(10, 10, CV_8UC1, Scalar::all(0.0))?;
        for y in 0..10 {
            for x in 0..10 {
                if (x / 2 + y / 2) % 2 == 0 {
                    *gray.at_2d_mut::<u8>(y, x)? = 255;
                }
            }
        }
        let template = DetectionTemplate::with_gray(gray)?;

        let assets = MapAssets {
            zones: ZoneCatalog::parse("inline", ZONES)?,
            reference,
            template,
        };
        Ok(MinimapPipeline::from_parts(
            assets,
            MarkerDetector::new(DetectionConfig::default()),
            registration,
            ReportingBuckets::default(),
        ))
    }

    fn frame() -> Result<Mat> {
        let mut frame = Mat::new_rows_cols_with_default(100, 100, CV_8UC3, Scalar::all(0.0))?;
        for (rect, color) in [
            (Rect::new(70, 20, 5, 5), Scalar::new(23.0, 22.0, 223.0, 0.0)),
            (Rect::new(10, 10, 5, 5), Scalar::new(125.0, 154.0, 0.0, 0.0)),
            (Rect::new(20, 30, 5, 5), Scalar::new(64.0, 221.0, 234.0, 0.0)),
            (Rect::new(30, 80, 5, 5), Scalar::new(41.0, 125.0, 223.0, 0.0)),
        ] {
            imgproc::rectangle(&mut frame, rect, color, imgproc::FILLED, imgproc::LINE_8, 0)?;
        }
        Ok(frame)
    }

    struct FixedFrame(Mat);

    impl FrameSource for FixedFrame {
        fn grab(&mut self) -> Result<Mat> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCapture;

    impl FrameSource for BrokenCapture {
        fn grab(&mut self) -> Result<Mat> {
            Err(anyhow!("display unavailable"))
        }
    }

    #[test]
    fn test_process_summarizes_frame() -> Result<()> {
        let summary = pipeline()?.process(&frame()?);

        assert_eq!(summary.enemy_text(), "B点");
        assert_eq!(summary.count("A平台"), 2);
        // The teammate at (32, 82) lies outside every zone
        assert_eq!(summary.total_teammates(), 2);
        assert!(summary.object_zones.is_empty());
        Ok(())
    }

    #[test]
    fn test_cycle_with_frame_source() -> Result<()> {
        let mut pipeline = pipeline()?;
        let summary = pipeline.cycle(&mut FixedFrame(frame()?));
        assert_eq!(summary.enemy_text(), "B点");
        Ok(())
    }

    #[test]
    fn test_capture_failure_yields_empty_summary() -> Result<()> {
        let mut pipeline = pipeline()?;
        let summary = pipeline.cycle(&mut BrokenCapture);

        assert_eq!(summary, FrameSummary::empty(&ReportingBuckets::default()));
        assert!(summary.is_quiet());
        Ok(())
    }
}
