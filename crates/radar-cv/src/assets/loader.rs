//! Asset loading with paths resolved against an asset directory

use super::{DetectionTemplate, MapAssets, ReferenceMap};
use crate::registration::FeatureExtractor;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use opencv::prelude::*;
use radar_core::ZoneCatalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Asset file names, relative to the asset directory unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub zones: PathBuf,
    pub reference_map: PathBuf,
    pub template: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            zones: "dust2.txt".into(),
            reference_map: "dust2.png".into(),
            template: "c4_template.png".into(),
        }
    }
}

/// Loads [`MapAssets`]; any missing or undecodable file is fatal.
pub struct AssetLoader {
    asset_dir: PathBuf,
    paths: AssetPaths,
}

impl AssetLoader {
    pub fn new<P: AsRef<Path>>(asset_dir: P, paths: AssetPaths) -> Self {
        Self {
            asset_dir: asset_dir.as_ref().to_path_buf(),
            paths,
        }
    }

    /// Resolve a configured path against the asset directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_dir.join(path)
        }
    }

    pub fn load_zones(&self) -> Result<ZoneCatalog> {
        let path = self.resolve(&self.paths.zones);
        ZoneCatalog::load(&path)
            .with_context(|| format!("Unusable zone definitions: {}", path.display()))
    }

    pub fn load_reference(&self, extractor: &mut FeatureExtractor) -> Result<ReferenceMap> {
        let path = self.resolve(&self.paths.reference_map);
        let image = ImageUtils::load_mat_color(&path)
            .with_context(|| format!("Failed to load reference map: {}", path.display()))?;
        let reference = ReferenceMap::build(image, extractor)?;

        info!(
            "✓ Reference map {}x{} with {} keypoints",
            reference.image.cols(),
            reference.image.rows(),
            reference.features.len()
        );
        Ok(reference)
    }

    pub fn load_template(&self) -> Result<DetectionTemplate> {
        let path = self.resolve(&self.paths.template);
        let image = ImageUtils::load_mat_color(&path)
            .with_context(|| format!("Failed to load detection template: {}", path.display()))?;
        let template = DetectionTemplate::from_color(&image)?;

        info!("✓ Detection template {}x{}", template.width, template.height);
        Ok(template)
    }

    /// Load all three assets. The extractor must be the one registration
    /// uses for live frames.
    pub fn load(&self, extractor: &mut FeatureExtractor) -> Result<MapAssets> {
        let zones = self.load_zones()?;
        info!("✓ {} zones loaded", zones.len());

        let reference = self.load_reference(extractor)?;
        let template = self.load_template()?;

        Ok(MapAssets {
            zones,
            reference,
            template,
        })
    }
}
