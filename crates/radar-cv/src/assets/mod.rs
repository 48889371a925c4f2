//! Startup assets: zone catalog, reference map, detection template
//!
//! Loaded once before the worker starts and read-only afterwards.

pub mod loader;

pub use loader::{AssetLoader, AssetPaths};

use crate::registration::{FeatureExtractor, Features};
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::ensure;
use opencv::{core::Mat, prelude::*};
use radar_core::ZoneCatalog;

/// Full-extent map image with its precomputed ORB features
pub struct ReferenceMap {
    pub image: Mat,
    pub features: Features,
}

impl ReferenceMap {
    /// Extract features once; every cycle matches against this fixed set.
    pub fn build(image: Mat, extractor: &mut FeatureExtractor) -> Result<Self> {
        let features = extractor.extract(&image)?;
        Ok(Self { image, features })
    }
}

/// Icon matched at fixed scale against the grayscale minimap
pub struct DetectionTemplate {
    pub gray: Mat,
    pub width: i32,
    pub height: i32,
}

impl DetectionTemplate {
    pub fn from_color(image: &Mat) -> Result<Self> {
        let gray = ImageUtils::to_grayscale(image)?;
        Self::with_gray(gray)
    }

    pub fn with_gray(gray: Mat) -> Result<Self> {
        ensure!(!gray.empty(), "Detection template is empty");
        let (width, height) = (gray.cols(), gray.rows());
        Ok(Self {
            gray,
            width,
            height,
        })
    }
}

/// Everything the pipeline reads but never writes
pub struct MapAssets {
    pub zones: ZoneCatalog,
    pub reference: ReferenceMap,
    pub template: DetectionTemplate,
}
