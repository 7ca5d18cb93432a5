//! Tunable settings for the compression pipeline.
//!
//! Every field has a default, so a host may pass a partial object (or none)
//! and get the standard behavior for the rest.

use serde::{Deserialize, Serialize};

use crate::codec::{FilterType, ImageCodec};
use crate::policy::DEFAULT_PNG_QUALITY_FLOOR;
use crate::{CompressError, Dimensions, EncodingPolicy};

/// Default bound on each axis.
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;
/// Requested quality above which a grown result is replaced by the original.
pub const DEFAULT_FALLBACK_QUALITY_THRESHOLD: f32 = 0.8;
/// Default quiescence window for slider changes.
pub const DEFAULT_DEBOUNCE_MS: u32 = 100;

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// Resampling filter for the resize step.
    pub filter: FilterType,
    /// Minimum JPEG quality for PNG sources.
    pub png_quality_floor: f32,
    /// Fallback to the original bytes only when the requested quality is
    /// strictly above this value.
    pub fallback_quality_threshold: f32,
    /// Debounce window for quality changes, in milliseconds.
    pub debounce_ms: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            filter: FilterType::default(),
            png_quality_floor: DEFAULT_PNG_QUALITY_FLOOR,
            fallback_quality_threshold: DEFAULT_FALLBACK_QUALITY_THRESHOLD,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl CompressionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(CompressError::InvalidConfig(format!(
                "max dimensions must be non-zero, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        if !(0.0..=1.0).contains(&self.png_quality_floor) {
            return Err(CompressError::InvalidConfig(format!(
                "png_quality_floor must be in [0, 1], got {}",
                self.png_quality_floor
            )));
        }
        if !(0.0..=1.0).contains(&self.fallback_quality_threshold) {
            return Err(CompressError::InvalidConfig(format!(
                "fallback_quality_threshold must be in [0, 1], got {}",
                self.fallback_quality_threshold
            )));
        }
        Ok(())
    }

    /// The bounding box images are clamped into.
    pub fn bound(&self) -> Dimensions {
        Dimensions::new(self.max_width, self.max_height)
    }

    pub fn encoding_policy(&self) -> EncodingPolicy {
        EncodingPolicy::new(self.png_quality_floor)
    }

    pub fn codec(&self) -> ImageCodec {
        ImageCodec::new(self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompressionConfig::new();
        assert_eq!(config.bound(), Dimensions::new(2048, 2048));
        assert_eq!(config.filter, FilterType::Bilinear);
        assert_eq!(config.png_quality_floor, 0.7);
        assert_eq!(config.fallback_quality_threshold, 0.8);
        assert_eq!(config.debounce_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_bound() {
        let mut config = CompressionConfig::default();
        config.max_height = 0;
        assert!(matches!(
            config.validate(),
            Err(CompressError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_fraction_ranges() {
        let mut config = CompressionConfig::default();
        config.png_quality_floor = 1.5;
        assert!(config.validate().is_err());

        let mut config = CompressionConfig::default();
        config.fallback_quality_threshold = -0.1;
        assert!(config.validate().is_err());

        let mut config = CompressionConfig::default();
        config.png_quality_floor = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_and_codec_follow_config() {
        let mut config = CompressionConfig::default();
        config.png_quality_floor = 0.85;
        config.filter = FilterType::Lanczos3;

        assert_eq!(config.encoding_policy().png_quality_floor, 0.85);
        assert_eq!(config.codec().filter, FilterType::Lanczos3);
    }
}
