//! imgpress Core - image compression library
//!
//! This crate holds the compression logic behind the imgpress browser tool:
//! choosing target dimensions, choosing an output encoding, re-encoding
//! through the `image` crate, and rejecting "compressed" results that come
//! out larger than the original at high quality settings.
//!
//! # Module Structure
//!
//! - `size` - Human-readable byte sizes
//! - `clamp` - Target dimensions under a maximum bound
//! - `policy` - Output type and quality selection
//! - `codec` - Decode, resize and encode behind the [`Codec`] trait
//! - `compress` - The orchestrator and its fallback rule
//! - `session` - Loaded source, displayed result and request sequencing
//! - `debounce` - Coalescing of rapid quality changes
//!
//! # Example
//!
//! ```ignore
//! use imgpress_core::{Compressor, Quality, SourceImage};
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let source = SourceImage::new("photo.png", "image/png", bytes).unwrap();
//! let result = Compressor::new().compress(&source, Quality::from_percent(80)).unwrap();
//! println!("{} -> {} bytes as {}", source.byte_len(), result.byte_len(), result.mime);
//! ```

pub mod clamp;
pub mod codec;
pub mod compress;
pub mod config;
pub mod debounce;
mod error;
pub mod mime;
pub mod policy;
mod quality;
pub mod session;
pub mod size;

pub use clamp::{clamp_dimensions, Dimensions};
pub use codec::{Codec, EncodedImage, FilterType, ImageCodec, Raster};
pub use compress::{should_fall_back, CompressionResult, Compressor, SourceImage};
pub use config::CompressionConfig;
pub use debounce::Debouncer;
pub use error::CompressError;
pub use mime::is_image_type;
pub use policy::{EncodingParams, EncodingPolicy};
pub use quality::Quality;
pub use session::{Completion, CompressionRequest, DisplaySurface, Download, Session};
pub use size::format_file_size;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let dims = clamp_dimensions(3000, 1000, CompressionConfig::default().bound()).unwrap();
        assert_eq!(dims, Dimensions::new(2048, 683));

        let params = EncodingPolicy::default().choose("image/png", Quality::from_percent(50));
        assert_eq!(params.mime, "image/jpeg");
        assert_eq!(params.quality.value(), 0.7);
    }
}
