//! Error type shared by every stage of the compression pipeline.

use thiserror::Error;

/// Errors reported by the compression pipeline.
///
/// Every variant is terminal for the request that produced it. Nothing is
/// retried automatically; a new attempt only happens when the user picks a
/// new file or moves the quality slider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompressError {
    /// The selected file does not declare an image content type.
    #[error("Not an image file: {0:?}")]
    InvalidInputType(String),

    /// The image bytes could not be decoded (corrupt or unsupported subtype).
    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    /// The encoder could not produce output for the chosen type and quality.
    #[error("Failed to encode image: {0}")]
    EncodeFailure(String),

    /// The decoded image has a zero width or height.
    #[error("Degenerate image dimensions: {width}x{height}")]
    DegenerateDimensions { width: u32, height: u32 },

    /// Quality fraction outside of (0, 1].
    #[error("Quality must be in (0, 1], got {0}")]
    InvalidQuality(f32),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A compression was requested before any image was loaded.
    #[error("No source image loaded")]
    NoSource,
}

impl CompressError {
    /// Whether this error belongs to the decode class.
    ///
    /// Degenerate dimensions are reported the same way as an undecodable file.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            CompressError::DecodeFailure(_) | CompressError::DegenerateDimensions { .. }
        )
    }
}
