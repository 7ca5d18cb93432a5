//! Compression orchestrator.
//!
//! Drives one request through decode, clamp, resize, policy and encode, then
//! applies the fallback rule. The orchestrator holds no per-request state;
//! which result is displayed is the session's concern.

use log::{debug, info};

use crate::clamp::clamp_dimensions;
use crate::codec::{Codec, ImageCodec, Raster};
use crate::config::CompressionConfig;
use crate::mime::is_image_type;
use crate::{CompressError, Dimensions, EncodingPolicy, Quality};

/// A selected image file: its name, declared type and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl SourceImage {
    /// Wrap a selected file.
    ///
    /// # Errors
    ///
    /// Returns `CompressError::InvalidInputType` if `mime` is not an image
    /// type. The bytes are not inspected here.
    pub fn new(
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CompressError> {
        let mime = mime.into();
        if !is_image_type(&mime) {
            return Err(CompressError::InvalidInputType(mime));
        }
        Ok(Self {
            file_name: file_name.into(),
            mime,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

/// Output of one compression request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    /// Encoded bytes (or the original bytes when `fell_back` is set).
    pub bytes: Vec<u8>,
    /// Mime type of `bytes`.
    pub mime: String,
    /// Pixel dimensions of the encoded image.
    pub dimensions: Dimensions,
    /// Whether the original file was kept because re-encoding grew it.
    pub fell_back: bool,
}

impl CompressionResult {
    /// A result that passes the source through unchanged.
    pub fn original(source: &SourceImage, dimensions: Dimensions) -> Self {
        Self {
            bytes: source.bytes.clone(),
            mime: source.mime.clone(),
            dimensions,
            fell_back: true,
        }
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

/// Decide whether an encode result is replaced by the original file.
///
/// Only a result that is larger than the source AND was requested at a
/// quality strictly above `threshold` falls back. At or below the threshold
/// a larger result is kept as produced.
pub fn should_fall_back(
    encoded_len: usize,
    source_len: usize,
    quality: Quality,
    threshold: f32,
) -> bool {
    encoded_len > source_len && quality.value() > threshold
}

/// Runs compression requests against a [`Codec`].
#[derive(Debug, Clone)]
pub struct Compressor<C = ImageCodec> {
    codec: C,
    bound: Dimensions,
    policy: EncodingPolicy,
    fallback_threshold: f32,
}

impl Compressor<ImageCodec> {
    /// A compressor with the default configuration.
    pub fn new() -> Self {
        let config = CompressionConfig::default();
        Self {
            codec: config.codec(),
            bound: config.bound(),
            policy: config.encoding_policy(),
            fallback_threshold: config.fallback_quality_threshold,
        }
    }

    /// A compressor using the `image` crate codec configured by `config`.
    pub fn from_config(config: &CompressionConfig) -> Result<Self, CompressError> {
        Self::with_codec(config.codec(), config)
    }
}

impl Default for Compressor<ImageCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> Compressor<C> {
    /// A compressor using a caller-supplied codec.
    pub fn with_codec(codec: C, config: &CompressionConfig) -> Result<Self, CompressError> {
        config.validate()?;
        Ok(Self {
            codec,
            bound: config.bound(),
            policy: config.encoding_policy(),
            fallback_threshold: config.fallback_quality_threshold,
        })
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Decode the source image.
    pub fn decode(&self, source: &SourceImage) -> Result<Raster, CompressError> {
        let raster = self.codec.decode(source.bytes())?;
        if raster.dimensions().is_degenerate() {
            return Err(CompressError::DegenerateDimensions {
                width: raster.width,
                height: raster.height,
            });
        }
        debug!(
            "decoded {} ({}x{}, {} bytes)",
            source.file_name(),
            raster.width,
            raster.height,
            source.byte_len()
        );
        Ok(raster)
    }

    /// Run the full pipeline: decode, then [`Compressor::compress_raster`].
    pub fn compress(
        &self,
        source: &SourceImage,
        quality: Quality,
    ) -> Result<CompressionResult, CompressError> {
        let raster = self.decode(source)?;
        self.compress_raster(source, &raster, quality)
    }

    /// Run the pipeline against an already decoded raster of `source`.
    pub fn compress_raster(
        &self,
        source: &SourceImage,
        raster: &Raster,
        quality: Quality,
    ) -> Result<CompressionResult, CompressError> {
        let target = clamp_dimensions(raster.width, raster.height, self.bound)?;
        let drawn = self.codec.resize(raster, target)?;

        let params = self.policy.choose(source.mime(), quality);
        debug!(
            "encoding {}x{} as {} at quality {:.2}",
            target.width,
            target.height,
            params.mime,
            params.quality.value()
        );
        let encoded = self.codec.encode(&drawn, &params)?;

        if should_fall_back(
            encoded.byte_len(),
            source.byte_len(),
            quality,
            self.fallback_threshold,
        ) {
            info!(
                "re-encoded {} is larger than the original ({} > {} bytes), keeping original",
                source.file_name(),
                encoded.byte_len(),
                source.byte_len()
            );
            return Ok(CompressionResult::original(source, raster.dimensions()));
        }

        debug!(
            "compressed {}: {} -> {} bytes",
            source.file_name(),
            source.byte_len(),
            encoded.byte_len()
        );
        Ok(CompressionResult {
            bytes: encoded.bytes,
            mime: encoded.mime,
            dimensions: target,
            fell_back: false,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A codec with scripted output for exercising the pipeline.

    use std::cell::RefCell;

    use crate::codec::{Codec, EncodedImage, Raster};
    use crate::{CompressError, Dimensions, EncodingParams};

    /// Decodes every input to a fixed-size raster and encodes to a fixed
    /// number of bytes, recording what it was asked to do.
    #[derive(Debug, Default)]
    pub struct ScriptedCodec {
        pub natural: Option<Dimensions>,
        pub encoded_len: usize,
        pub fail_encode: bool,
        pub resized_to: RefCell<Vec<Dimensions>>,
        pub encoded_with: RefCell<Vec<EncodingParams>>,
    }

    impl ScriptedCodec {
        pub fn new(width: u32, height: u32, encoded_len: usize) -> Self {
            Self {
                natural: Some(Dimensions::new(width, height)),
                encoded_len,
                ..Default::default()
            }
        }
    }

    impl Codec for ScriptedCodec {
        fn decode(&self, bytes: &[u8]) -> Result<Raster, CompressError> {
            match self.natural {
                Some(dims) if !bytes.is_empty() => {
                    Ok(Raster::filled(dims.width, dims.height, [128, 128, 128, 255]))
                }
                _ => Err(CompressError::DecodeFailure("scripted".to_string())),
            }
        }

        fn resize(&self, _raster: &Raster, target: Dimensions) -> Result<Raster, CompressError> {
            self.resized_to.borrow_mut().push(target);
            Ok(Raster::filled(target.width, target.height, [0, 0, 0, 255]))
        }

        fn encode(
            &self,
            _raster: &Raster,
            params: &EncodingParams,
        ) -> Result<EncodedImage, CompressError> {
            self.encoded_with.borrow_mut().push(params.clone());
            if self.fail_encode {
                return Err(CompressError::EncodeFailure("scripted".to_string()));
            }
            Ok(EncodedImage {
                bytes: vec![0xAB; self.encoded_len],
                mime: params.mime.clone(),
            })
        }
    }
}
