//! Screen grabs through xcap

use super::CaptureRegion;
use crate::traits::FrameSource;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::{Context, anyhow, ensure};
use image::imageops;
use opencv::core::Mat;
use tracing::debug;
use xcap::Monitor;

/// Captures the configured region of the primary monitor.
///
/// Monitor handles are acquired per grab and dropped before it returns, so
/// nothing is held between cycles.
#[derive(Debug, Clone)]
pub struct ScreenCapturer {
    region: CaptureRegion,
}

impl ScreenCapturer {
    pub fn new(region: CaptureRegion) -> Self {
        Self { region }
    }

    /// Grab the region as RGBA
    pub fn capture_rgba(&self) -> Result<image::RgbaImage> {
        let monitors = Monitor::all().context("Failed to enumerate monitors")?;
        let monitor = pick_primary(monitors, Monitor::is_primary)
            .ok_or_else(|| anyhow!("No monitor available"))?;

        let screen = monitor.capture_image().context("Screen capture failed")?;
        let (width, height) = screen.dimensions();
        ensure!(
            self.region.fits_within(width, height),
            "Capture region {:?} outside {}x{} screen",
            self.region,
            width,
            height
        );

        let r = self.region;
        Ok(imageops::crop_imm(&screen, r.left, r.top, r.width, r.height).to_image())
    }
}

impl FrameSource for ScreenCapturer {
    fn grab(&mut self) -> Result<Mat> {
        let rgba = self.capture_rgba()?;
        debug!("Captured {}x{} region", rgba.width(), rgba.height());
        ImageUtils::rgba_to_bgr_mat(&rgba)
    }
}

/// The primary monitor, or the first one when none reports as primary
fn pick_primary<M>(monitors: Vec<M>, is_primary: impl Fn(&M) -> bool) -> Option<M> {
    let index = monitors.iter().position(|m| is_primary(m)).unwrap_or(0);
    monitors.into_iter().nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_monitor_is_preferred() {
        let monitors = vec![("left", false), ("main", true), ("right", false)];
        assert_eq!(pick_primary(monitors, |m| m.1), Some(("main", true)));
    }

    #[test]
    fn test_falls_back_to_first_monitor() {
        let monitors = vec![("left", false), ("right", false)];
        assert_eq!(pick_primary(monitors, |m| m.1), Some(("left", false)));
        assert_eq!(pick_primary(Vec::<(&str, bool)>::new(), |m| m.1), None);
    }
}
