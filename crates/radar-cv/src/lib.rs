//! Radar Computer Vision Library
//!
//! OpenCV side of the minimap radar: asset loading, screen capture, marker
//! detection, and registration of the live minimap against the reference map.

pub mod assets;
pub mod bbox;
pub mod capture;
pub mod config;
pub mod detection;
pub mod pipeline;
pub mod registration;
pub mod utils;

// Re-export commonly used types
pub use assets::{DetectionTemplate, MapAssets, ReferenceMap};
pub use bbox::BBox;
pub use capture::{CaptureRegion, ScreenCapturer};
pub use config::RadarConfig;
pub use detection::{DetectionConfig, MarkerDetector};
pub use pipeline::MinimapPipeline;
pub use registration::{FeatureExtractor, RegistrationConfig, RegistrationEngine};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use super::*;
    use opencv::core::Mat;

    /// Source of 3-channel BGR frames, one per cycle
    pub trait FrameSource {
        fn grab(&mut self) -> Result<Mat>;
    }
}
