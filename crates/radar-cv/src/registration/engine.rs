//! Per-cycle homography estimation (live minimap -> reference map)

use super::{FeatureExtractor, Features, RegistrationConfig};
use crate::assets::ReferenceMap;
use crate::Result;
use anyhow::Context;
use opencv::{
    calib3d,
    core::{self, DMatch, Mat, Point2f, Ptr, Vector, NORM_HAMMING},
    features2d::BFMatcher,
    prelude::*,
};
use radar_core::Homography;
use tracing::{debug, warn};

/// ORB + cross-checked Hamming matching + RANSAC homography.
///
/// Every failure mode (too few descriptors, too few matches, no model found,
/// OpenCV error) yields `None` for the cycle; nothing is carried over from
/// previous cycles.
pub struct RegistrationEngine {
    config: RegistrationConfig,
    extractor: FeatureExtractor,
    matcher: Ptr<BFMatcher>,
}

impl RegistrationEngine {
    pub fn new(config: RegistrationConfig) -> Result<Self> {
        let extractor = FeatureExtractor::new(config.max_features)?;
        let matcher = BFMatcher::create(NORM_HAMMING, true).context("Failed to create BFMatcher")?;

        Ok(Self {
            config,
            extractor,
            matcher,
        })
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Extractor with the same parameters the live frames use; the reference
    /// map must be built with it.
    pub fn extractor_mut(&mut self) -> &mut FeatureExtractor {
        &mut self.extractor
    }

    /// Estimate the live -> reference transform for one frame.
    pub fn register(&mut self, frame: &Mat, reference: &ReferenceMap) -> Option<Homography> {
        match self.try_register(frame, reference) {
            Ok(homography) => homography,
            Err(e) => {
                warn!("Registration failed this cycle: {:#}", e);
                None
            }
        }
    }

    fn try_register(&mut self, frame: &Mat, reference: &ReferenceMap) -> Result<Option<Homography>> {
        let live = self.extractor.extract(frame)?;
        if live.len() < self.config.min_descriptors {
            debug!(
                "Only {} live descriptors (need {}), skipping homography",
                live.len(),
                self.config.min_descriptors
            );
            return Ok(None);
        }
        if reference.features.is_empty() {
            return Ok(None);
        }

        let (src, dst) = self.match_points(&live, &reference.features)?;
        self.estimate(&src, &dst)
    }

    /// Cross-checked matches as (live point, reference point) pairs
    fn match_points(&self, live: &Features, reference: &Features) -> Result<(Vec<Point2f>, Vec<Point2f>)> {
        let mut matches = Vector::<DMatch>::new();
        self.matcher
            .train_match(&live.descriptors, &reference.descriptors, &mut matches, &core::no_array())
            .context("Descriptor matching failed")?;

        let mut src = Vec::with_capacity(matches.len());
        let mut dst = Vec::with_capacity(matches.len());
        for m in matches.iter() {
            src.push(live.keypoints.get(m.query_idx as usize)?.pt());
            dst.push(reference.keypoints.get(m.train_idx as usize)?.pt());
        }

        Ok((src, dst))
    }

    /// Robust homography from point correspondences.
    ///
    /// Fewer than `min_matches` pairs gives `Ok(None)` without estimating.
    pub fn estimate(&self, src: &[Point2f], dst: &[Point2f]) -> Result<Option<Homography>> {
        anyhow::ensure!(
            src.len() == dst.len(),
            "Correspondence count mismatch: {} vs {}",
            src.len(),
            dst.len()
        );
        if src.len() < self.config.min_matches {
            debug!(
                "Only {} matches (need {}), skipping homography",
                src.len(),
                self.config.min_matches
            );
            return Ok(None);
        }

        let src_points: Vector<Point2f> = src.iter().copied().collect();
        let dst_points: Vector<Point2f> = dst.iter().copied().collect();
        let mut inlier_mask = Mat::default();

        let h = calib3d::find_homography(
            &src_points,
            &dst_points,
            &mut inlier_mask,
            calib3d::RANSAC,
            self.config.ransac_reproj_threshold,
        )
        .context("findHomography failed")?;

        let homography = mat_to_homography(&h)?;
        if homography.is_some() {
            let inliers = if inlier_mask.empty() {
                0
            } else {
                core::count_non_zero(&inlier_mask)?
            };
            debug!("Homography from {} matches ({} inliers)", src.len(), inliers);
        } else {
            debug!("RANSAC found no homography from {} matches", src.len());
        }

        Ok(homography)
    }
}

fn mat_to_homography(h: &Mat) -> Result<Option<Homography>> {
    if h.empty() || h.rows() != 3 || h.cols() != 3 {
        return Ok(None);
    }

    let mut m = [[0.0; 3]; 3];
    for (r, row) in m.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = *h.at_2d::<f64>(r as i32, c as i32)?;
        }
    }

    if m.iter().flatten().any(|v| !v.is_finite()) {
        return Ok(None);
    }
    Ok(Some(Homography::new(m)))
}
