//! Top-level radar configuration
//!
//! Every field has a default matching the stock dust2 setup, so an empty or
//! partial JSON document is a valid configuration.

use crate::assets::AssetPaths;
use crate::capture::CaptureRegion;
use crate::detection::DetectionConfig;
use crate::registration::RegistrationConfig;
use crate::Result;
use anyhow::Context;
use radar_core::ReportingBuckets;
use radar_core::runtime::PacingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub capture: CaptureRegion,
    pub detection: DetectionConfig,
    pub registration: RegistrationConfig,
    pub pacing: PacingConfig,
    pub buckets: ReportingBuckets,
    pub assets: AssetPaths,
}

impl RadarConfig {
    /// Load a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() -> Result<()> {
        assert_eq!(RadarConfig::from_json("{}")?, RadarConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_override() -> Result<()> {
        let config = RadarConfig::from_json(
            r#"{
                "capture": { "left": 0, "top": 0 },
                "detection": { "template_threshold": 0.8 },
                "pacing": { "target_period_ms": 250 }
            }"#,
        )?;

        assert_eq!(config.capture.left, 0);
        assert_eq!(config.capture.width, 436);
        assert_eq!(config.detection.template_threshold, 0.8);
        assert_eq!(config.detection.teammates.len(), 5);
        assert_eq!(config.pacing.target_period_ms, 250);
        assert_eq!(config.pacing.suspended_poll_ms, 500);
        assert_eq!(config.registration, RegistrationConfig::default());
        Ok(())
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        assert!(RadarConfig::from_json("{ \"capture\": 3 }").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(RadarConfig::load("/nonexistent/radar.json").is_err());
    }
}
