//! Marker detection on the live minimap

pub mod color;
pub mod config;
pub mod detector;
pub mod template;

pub use config::{ColorBand, DetectionConfig};
pub use detector::MarkerDetector;
pub use template::TemplateMatcher;
