//! Image loading and conversion helpers
//!
//! Every color `Mat` handled by the pipeline is 3-channel BGR, the channel
//! order OpenCV decodes files into; captured RGBA frames are converted on
//! entry so the configured marker colors apply to both.

use crate::Result;
use anyhow::{Context, bail, ensure};
use opencv::{
    core::Mat,
    imgcodecs::{self, IMREAD_COLOR},
    imgproc,
    prelude::*,
};
use std::path::Path;

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Load image directly from path as OpenCV Mat (BGR)
    pub fn load_mat_color<P: AsRef<Path>>(path: P) -> Result<Mat> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("Image not found: {}", path.display());
        }
        let path_str = path.to_string_lossy();

        let mat = imgcodecs::imread(&path_str, IMREAD_COLOR)
            .with_context(|| format!("Failed to load color image: {}", path_str))?;
        // imread signals decode failure with an empty Mat rather than an error
        ensure!(!mat.empty(), "Failed to decode image: {}", path_str);

        Ok(mat)
    }

    /// BGR -> single channel
    pub fn to_grayscale(bgr: &Mat) -> Result<Mat> {
        let mut gray = Mat::default();
        imgproc::cvt_color(bgr, &mut gray, imgproc::COLOR_BGR2GRAY, 0)
            .context("Failed to convert image to grayscale")?;
        Ok(gray)
    }

    /// Convert image::RgbaImage (screen capture) to a BGR Mat, dropping alpha
    pub fn rgba_to_bgr_mat(rgba_image: &image::RgbaImage) -> Result<Mat> {
        let (width, height) = rgba_image.dimensions();
        ensure!(width > 0 && height > 0, "Empty image ({}x{})", width, height);

        // Borrowed view over the RGBA buffer: one row of bytes, reshaped to
        // `height` rows of 4-channel pixels
        let flat = Mat::from_slice(rgba_image.as_raw()).context("Failed to wrap RGBA buffer")?;
        let rgba = flat
            .reshape(4, height as i32)
            .context("Failed to reshape RGBA buffer")?;

        let mut bgr = Mat::default();
        imgproc::cvt_color(&*rgba, &mut bgr, imgproc::COLOR_RGBA2BGR, 0)
            .context("Failed to convert RGBA to BGR")?;
        Ok(bgr)
    }
}
