//! Detection configuration

use opencv::core::Scalar;
use serde::{Deserialize, Serialize};

/// Reference color with an inclusive per-channel tolerance.
///
/// Channel order is BGR, matching the frames the pipeline sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBand {
    pub color: [u8; 3],
    pub tolerance: u8,
}

impl ColorBand {
    pub const fn new(color: [u8; 3], tolerance: u8) -> Self {
        Self { color, tolerance }
    }

    /// `color - tolerance`, clamped at 0
    pub fn lower(&self) -> [u8; 3] {
        self.color.map(|c| c.saturating_sub(self.tolerance))
    }

    /// `color + tolerance`, clamped at 255
    pub fn upper(&self) -> [u8; 3] {
        self.color.map(|c| c.saturating_add(self.tolerance))
    }

    pub fn contains(&self, bgr: [u8; 3]) -> bool {
        let (lo, hi) = (self.lower(), self.upper());
        (0..3).all(|i| lo[i] <= bgr[i] && bgr[i] <= hi[i])
    }

    pub(crate) fn lower_scalar(&self) -> Scalar {
        to_scalar(self.lower())
    }

    pub(crate) fn upper_scalar(&self) -> Scalar {
        to_scalar(self.upper())
    }
}

fn to_scalar([b, g, r]: [u8; 3]) -> Scalar {
    Scalar::new(f64::from(b), f64::from(g), f64::from(r), 0.0)
}

/// Main detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub enemy: ColorBand,
    /// Masks are OR-ed together before contour extraction
    pub teammates: Vec<ColorBand>,
    /// TM_CCOEFF_NORMED score at or above which a location counts as a hit
    pub template_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enemy: ColorBand::new([23, 22, 223], 15),
            teammates: vec![
                ColorBand::new([125, 154, 0], 1),
                ColorBand::new([41, 125, 223], 1),
                ColorBand::new([237, 200, 132], 1),
                ColorBand::new([146, 43, 183], 1),
                ColorBand::new([64, 221, 234], 1),
            ],
            template_threshold: 0.70,
        }
    }
}
