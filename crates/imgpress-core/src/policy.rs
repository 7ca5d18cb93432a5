//! Output type and quality selection.
//!
//! Sources keep their own type and the requested quality, except PNG. PNG is
//! lossless and has no quality knob, so it is re-targeted to JPEG for size
//! reduction, with a quality floor because PNG sources tend to carry detail
//! (text, line art) that degrades badly on a low-quality lossy encode. The
//! floor is a tunable heuristic, not a measured threshold.

use serde::{Deserialize, Serialize};

use crate::mime::{IMAGE_JPEG, IMAGE_PNG};
use crate::Quality;

/// Default quality floor applied when re-targeting PNG to JPEG.
pub const DEFAULT_PNG_QUALITY_FLOOR: f32 = 0.7;

/// Output mime type and effective quality for one encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingParams {
    pub mime: String,
    pub quality: Quality,
}

/// Decision rule mapping a source type and requested quality to
/// [`EncodingParams`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingPolicy {
    /// Minimum JPEG quality used for PNG sources.
    pub png_quality_floor: f32,
}

impl Default for EncodingPolicy {
    fn default() -> Self {
        Self {
            png_quality_floor: DEFAULT_PNG_QUALITY_FLOOR,
        }
    }
}

impl EncodingPolicy {
    pub fn new(png_quality_floor: f32) -> Self {
        Self { png_quality_floor }
    }

    /// Choose the output type and effective quality.
    pub fn choose(&self, source_mime: &str, quality: Quality) -> EncodingParams {
        if source_mime.trim().eq_ignore_ascii_case(IMAGE_PNG) {
            EncodingParams {
                mime: IMAGE_JPEG.to_string(),
                quality: quality.at_least(self.png_quality_floor),
            }
        } else {
            EncodingParams {
                mime: source_mime.to_string(),
                quality,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(value: f32) -> Quality {
        Quality::new(value).unwrap()
    }

    #[test]
    fn test_png_becomes_jpeg_with_floor() {
        let params = EncodingPolicy::default().choose("image/png", q(0.5));
        assert_eq!(params.mime, "image/jpeg");
        assert_eq!(params.quality.value(), 0.7);
    }

    #[test]
    fn test_png_above_floor_keeps_quality() {
        let params = EncodingPolicy::default().choose("image/png", q(0.95));
        assert_eq!(params.mime, "image/jpeg");
        assert_eq!(params.quality.value(), 0.95);
    }

    #[test]
    fn test_png_match_ignores_case() {
        let params = EncodingPolicy::default().choose("IMAGE/PNG", q(0.5));
        assert_eq!(params.mime, "image/jpeg");
    }

    #[test]
    fn test_other_types_pass_through() {
        let policy = EncodingPolicy::default();
        for mime in ["image/jpeg", "image/webp", "image/gif", "image/bmp"] {
            let params = policy.choose(mime, q(0.3));
            assert_eq!(params.mime, mime);
            assert_eq!(params.quality.value(), 0.3);
        }
    }

    #[test]
    fn test_custom_floor() {
        let params = EncodingPolicy::new(0.9).choose("image/png", q(0.5));
        assert_eq!(params.quality.value(), 0.9);

        // A floor of zero disables the adjustment
        let params = EncodingPolicy::new(0.0).choose("image/png", q(0.5));
        assert_eq!(params.quality.value(), 0.5);
    }
}
