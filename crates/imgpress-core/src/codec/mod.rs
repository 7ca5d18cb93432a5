//! Image codec: decode, resize, encode.
//!
//! The compression pipeline treats these three operations as an opaque
//! service behind the [`Codec`] trait. [`ImageCodec`] binds them to the
//! `image` crate; tests substitute codecs with scripted encoder output.
//!
//! # Examples
//!
//! ```ignore
//! use imgpress_core::codec::{Codec, ImageCodec};
//!
//! let codec = ImageCodec::default();
//! let raster = codec.decode(&std::fs::read("photo.png").unwrap()).unwrap();
//! println!("Decoded {}x{} image", raster.width, raster.height);
//! ```

mod decode;
mod encode;
mod raster;
mod resize;

pub use decode::decode_image;
pub use encode::{encode_raster, EncodedImage, OutputFormat};
pub use raster::{FilterType, Orientation, Raster};
pub use resize::resize;

use crate::{CompressError, Dimensions, EncodingParams};

/// Bytes-to-raster decode, raster resize and raster-to-bytes encode.
pub trait Codec {
    /// Decode compressed image bytes into a raster.
    fn decode(&self, bytes: &[u8]) -> Result<Raster, CompressError>;

    /// Draw `raster` at `target` dimensions.
    fn resize(&self, raster: &Raster, target: Dimensions) -> Result<Raster, CompressError>;

    /// Encode `raster` with the chosen type and quality.
    fn encode(&self, raster: &Raster, params: &EncodingParams)
        -> Result<EncodedImage, CompressError>;
}

/// [`Codec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageCodec {
    /// Resampling filter for the resize step.
    pub filter: FilterType,
}

impl ImageCodec {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Codec for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, CompressError> {
        decode_image(bytes)
    }

    fn resize(&self, raster: &Raster, target: Dimensions) -> Result<Raster, CompressError> {
        resize(raster, target, self.filter)
    }

    fn encode(
        &self,
        raster: &Raster,
        params: &EncodingParams,
    ) -> Result<EncodedImage, CompressError> {
        encode_raster(raster, params)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::encode_test_png;
    use super::*;
    use crate::Quality;

    #[test]
    fn test_image_codec_pipeline() {
        let codec = ImageCodec::new(FilterType::Lanczos3);
        let raster = codec.decode(&encode_test_png(40, 20)).unwrap();
        let resized = codec.resize(&raster, Dimensions::new(20, 10)).unwrap();
        let encoded = codec
            .encode(
                &resized,
                &EncodingParams {
                    mime: "image/jpeg".to_string(),
                    quality: Quality::new(0.8).unwrap(),
                },
            )
            .unwrap();

        assert_eq!(encoded.mime, "image/jpeg");
        let decoded = codec.decode(&encoded.bytes).unwrap();
        assert_eq!(decoded.dimensions(), Dimensions::new(20, 10));
    }

    #[test]
    fn test_default_filter_is_bilinear() {
        assert_eq!(ImageCodec::default().filter, FilterType::Bilinear);
    }
}
