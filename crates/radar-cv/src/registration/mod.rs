//! Registration of the live minimap against the reference map

pub mod engine;
pub mod features;

pub use engine::RegistrationEngine;
pub use features::{FeatureExtractor, Features};

use serde::{Deserialize, Serialize};

/// Registration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// ORB feature cap, shared by the reference map and every live frame
    pub max_features: i32,
    /// Below this many live descriptors the cycle skips estimation
    pub min_descriptors: usize,
    /// Below this many cross-checked matches the cycle skips estimation
    pub min_matches: usize,
    /// RANSAC inlier distance in reference-map pixels
    pub ransac_reproj_threshold: f64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            max_features: 300,
            min_descriptors: 10,
            min_matches: 10,
            ransac_reproj_threshold: 5.0,
        }
    }
}
