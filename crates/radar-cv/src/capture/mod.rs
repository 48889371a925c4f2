//! Fixed-region screen capture

pub mod screen;

pub use screen::ScreenCapturer;

use serde::{Deserialize, Serialize};

/// Screen rectangle sampled every cycle, in physical pixels of the
/// primary monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureRegion {
    fn default() -> Self {
        Self {
            left: 40,
            top: 40,
            width: 436,
            height: 434,
        }
    }
}

impl CaptureRegion {
    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// Whether the region lies entirely inside a `width` x `height` screen
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= width && self.bottom() <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region() {
        let region = CaptureRegion::default();
        assert_eq!((region.right(), region.bottom()), (476, 474));
        assert!(region.fits_within(1920, 1080));
    }

    #[test]
    fn test_region_outside_screen() {
        let region = CaptureRegion {
            left: 1800,
            ..CaptureRegion::default()
        };
        assert!(!region.fits_within(1920, 1080));

        let empty = CaptureRegion {
            width: 0,
            ..CaptureRegion::default()
        };
        assert!(!empty.fits_within(1920, 1080));
    }
}
