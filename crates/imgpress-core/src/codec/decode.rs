//! Image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{Orientation, Raster};
use crate::CompressError;

/// Decode image bytes of any supported format into an RGBA raster.
///
/// The format is sniffed from the bytes rather than trusted from the declared
/// type. EXIF orientation is applied, matching how a browser displays the
/// image.
///
/// # Errors
///
/// Returns `CompressError::DecodeFailure` if the bytes are not a recognized
/// or intact image, and `CompressError::DegenerateDimensions` if the decoded
/// image has no pixels.
pub fn decode_image(bytes: &[u8]) -> Result<Raster, CompressError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CompressError::DecodeFailure(e.to_string()))?;

    if reader.format().is_none() {
        return Err(CompressError::DecodeFailure(
            "unrecognized image format".to_string(),
        ));
    }

    let img = reader
        .decode()
        .map_err(|e| CompressError::DecodeFailure(e.to_string()))?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(CompressError::DegenerateDimensions { width, height });
    }

    let oriented = apply_orientation(img, orientation);
    Ok(Raster::from_rgba_image(oriented.into_rgba8()))
}

/// Read the EXIF orientation tag, defaulting to `Normal` when absent.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
