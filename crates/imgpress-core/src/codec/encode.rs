//! Raster encoding for the re-encode step.
//!
//! JPEG honors the quality fraction. PNG and WebP are written losslessly
//! (the `image` crate's WebP encoder has no lossy mode), so quality is
//! ignored for them. Any other requested type falls back to PNG, the same
//! substitution a canvas makes for types it cannot produce; the mime actually
//! written is reported on [`EncodedImage`].

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::Raster;
use crate::mime::{IMAGE_JPEG, IMAGE_PNG, IMAGE_WEBP};
use crate::{CompressError, EncodingParams, Quality};

/// Formats the encoder can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Pick the format for a requested mime type, falling back to PNG.
    pub fn for_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => OutputFormat::Jpeg,
            "image/webp" => OutputFormat::WebP,
            _ => OutputFormat::Png,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => IMAGE_JPEG,
            OutputFormat::Png => IMAGE_PNG,
            OutputFormat::WebP => IMAGE_WEBP,
        }
    }
}

/// Encoder output: the bytes and the mime type they are in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl EncodedImage {
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

/// Encode a raster using the given output parameters.
///
/// # Errors
///
/// Returns `CompressError::EncodeFailure` if the raster is empty, its buffer
/// does not match its dimensions, or the underlying encoder fails.
pub fn encode_raster(
    raster: &Raster,
    params: &EncodingParams,
) -> Result<EncodedImage, CompressError> {
    validate(raster)?;

    let format = OutputFormat::for_mime(&params.mime);
    let bytes = match format {
        OutputFormat::Jpeg => encode_jpeg(raster, params.quality)?,
        OutputFormat::Png => encode_lossless(raster, |buf, r| {
            PngEncoder::new(buf).write_image(&r.pixels, r.width, r.height, ExtendedColorType::Rgba8)
        })?,
        OutputFormat::WebP => encode_lossless(raster, |buf, r| {
            WebPEncoder::new_lossless(buf).write_image(
                &r.pixels,
                r.width,
                r.height,
                ExtendedColorType::Rgba8,
            )
        })?,
    };

    Ok(EncodedImage {
        bytes,
        mime: format.mime().to_string(),
    })
}

fn validate(raster: &Raster) -> Result<(), CompressError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(CompressError::EncodeFailure(format!(
            "invalid dimensions {}x{}",
            raster.width, raster.height
        )));
    }

    let expected = raster.width as usize * raster.height as usize * Raster::CHANNELS;
    if raster.pixels.len() != expected {
        return Err(CompressError::EncodeFailure(format!(
            "expected {expected} bytes of pixel data, got {}",
            raster.pixels.len()
        )));
    }
    Ok(())
}

fn encode_jpeg(raster: &Raster, quality: Quality) -> Result<Vec<u8>, CompressError> {
    let rgb = raster.flatten_to_rgb();
    let mut buffer = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut buffer, quality.to_percent())
        .write_image(&rgb, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| CompressError::EncodeFailure(e.to_string()))?;

    Ok(buffer.into_inner())
}

fn encode_lossless<F>(raster: &Raster, write: F) -> Result<Vec<u8>, CompressError>
where
    F: FnOnce(&mut Cursor<Vec<u8>>, &Raster) -> image::ImageResult<()>,
{
    let mut buffer = Cursor::new(Vec::new());
    write(&mut buffer, raster).map_err(|e| CompressError::EncodeFailure(e.to_string()))?;
    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
