//! Color-threshold segmentation and blob centroids

use super::ColorBand;
use crate::Result;
use anyhow::Context;
use opencv::{
    core::{self, Mat, Point as CvPoint, Scalar, Vector, CV_8UC1},
    imgproc,
    prelude::*,
};
use radar_core::Point;

/// Binary mask (255 inside, 0 outside) of pixels inside the band on all
/// three channels
pub fn band_mask(frame: &Mat, band: &ColorBand) -> Result<Mat> {
    let mut mask = Mat::default();
    core::in_range(frame, &band.lower_scalar(), &band.upper_scalar(), &mut mask)
        .context("inRange failed")?;
    Ok(mask)
}

/// Logical OR of the masks of every band
pub fn union_mask(frame: &Mat, bands: &[ColorBand]) -> Result<Mat> {
    let mut combined =
        Mat::new_rows_cols_with_default(frame.rows(), frame.cols(), CV_8UC1, Scalar::all(0.0))?;

    for band in bands {
        let mask = band_mask(frame, band)?;
        let mut merged = Mat::default();
        core::bitwise_or(&combined, &mask, &mut merged, &core::no_array())?;
        combined = merged;
    }

    Ok(combined)
}

/// Centroid of every external contour of the mask.
///
/// Contours with a zero area moment are skipped. Coordinates are truncated
/// toward zero.
pub fn contour_centroids(mask: &Mat) -> Result<Vec<Point>> {
    let mut contours = Vector::<Vector<CvPoint>>::new();
    imgproc::find_contours(
        mask,
        &mut contours,
        imgproc::RETR_EXTERNAL,
        imgproc::CHAIN_APPROX_SIMPLE,
        CvPoint::new(0, 0),
    )
    .context("findContours failed")?;

    let mut centroids = Vec::with_capacity(contours.len());
    for contour in contours.iter() {
        let m = imgproc::moments(&contour, false)?;
        if m.m00 == 0.0 {
            continue;
        }
        centroids.push(Point::new((m.m10 / m.m00) as i32, (m.m01 / m.m00) as i32));
    }

    Ok(centroids)
}
