//! Fixed-scale template matching for the planted-device icon

use crate::assets::DetectionTemplate;
use crate::bbox::BBox;
use crate::Result;
use anyhow::Context;
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
};

/// Normalized cross-correlation matcher.
///
/// Every location scoring at or above the threshold is a hit. Adjacent hits
/// of the same icon are not merged; they land in the same zone anyway.
#[derive(Debug, Clone, Copy)]
pub struct TemplateMatcher {
    threshold: f64,
}

impl TemplateMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Match the template against a single-channel frame.
    ///
    /// Hits are reported in row-major order of their top-left corner.
    pub fn match_all(&self, gray: &Mat, template: &DetectionTemplate) -> Result<Vec<BBox>> {
        if gray.cols() < template.width || gray.rows() < template.height {
            return Ok(Vec::new());
        }

        let mut result = Mat::default();
        imgproc::match_template(
            gray,
            &template.gray,
            &mut result,
            imgproc::TM_CCOEFF_NORMED,
            &core::no_array(),
        )
        .context("Template matching failed")?;

        let mut hits = Vec::new();
        for y in 0..result.rows() {
            for x in 0..result.cols() {
                let score = f64::from(*result.at_2d::<f32>(y, x)?);
                if score >= self.threshold {
                    hits.push(BBox::new(x, y, template.width, template.height, score));
                }
            }
        }

        Ok(hits)
    }
}
