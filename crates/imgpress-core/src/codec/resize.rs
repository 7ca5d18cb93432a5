//! Raster resampling for the draw-at-target-size step.

use super::{FilterType, Raster};
use crate::{CompressError, Dimensions};

/// Resize a raster to exact dimensions.
///
/// Returns a new raster; the input is left untouched. Matching dimensions
/// short-circuit to a clone.
///
/// # Errors
///
/// Returns `CompressError::DegenerateDimensions` if either target side is
/// zero, and `CompressError::DecodeFailure` if the source buffer does not
/// match its declared dimensions.
pub fn resize(
    raster: &Raster,
    target: Dimensions,
    filter: FilterType,
) -> Result<Raster, CompressError> {
    if target.is_degenerate() {
        return Err(CompressError::DegenerateDimensions {
            width: target.width,
            height: target.height,
        });
    }

    if raster.dimensions() == target {
        return Ok(raster.clone());
    }

    let rgba = raster.to_rgba_image().ok_or_else(|| {
        CompressError::DecodeFailure(format!(
            "pixel buffer of {} bytes does not match {}x{}",
            raster.pixels.len(),
            raster.width,
            raster.height
        ))
    })?;

    let resized = image::imageops::resize(
        &rgba,
        target.width,
        target.height,
        filter.to_image_filter(),
    );

    Ok(Raster::from_rgba_image(resized))
}
