//! ORB keypoints and binary descriptors

use crate::Result;
use anyhow::Context;
use opencv::{
    core::{self, KeyPoint, Mat, Ptr, Vector},
    features2d::{ORB, ORB_ScoreType},
    prelude::*,
};

/// Keypoints with one descriptor row each
pub struct Features {
    pub keypoints: Vector<KeyPoint>,
    pub descriptors: Mat,
}

impl Features {
    /// Number of descriptor rows (zero when nothing was found)
    pub fn len(&self) -> usize {
        if self.descriptors.empty() {
            0
        } else {
            self.descriptors.rows() as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// ORB detector configured once and reused for every image, so reference
/// and live descriptors are comparable.
pub struct FeatureExtractor {
    orb: Ptr<ORB>,
}

impl FeatureExtractor {
    pub fn new(max_features: i32) -> Result<Self> {
        let orb = ORB::create(
            max_features,
            1.2,
            8,
            31,
            0,
            2,
            ORB_ScoreType::HARRIS_SCORE,
            31,
            20,
        )
        .context("Failed to create ORB detector")?;

        Ok(Self { orb })
    }

    /// Detect keypoints and compute descriptors over the whole image
    pub fn extract(&mut self, image: &Mat) -> Result<Features> {
        let mut keypoints = Vector::<KeyPoint>::new();
        let mut descriptors = Mat::default();

        self.orb
            .detect_and_compute(image, &core::no_array(), &mut keypoints, &mut descriptors, false)
            .context("ORB detect_and_compute failed")?;

        Ok(Features {
            keypoints,
            descriptors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{CV_8UC3, Scalar};

    #[test]
    fn test_flat_image_has_no_features() -> Result<()> {
        let image = Mat::new_rows_cols_with_default(120, 120, CV_8UC3, Scalar::all(90.0))?;
        let mut extractor = FeatureExtractor::new(300)?;
        let features = extractor.extract(&image)?;
        assert!(features.is_empty());
        Ok(())
    }
}
