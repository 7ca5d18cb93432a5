//! Mime type names and the image-type check applied to incoming files.

pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";
pub const IMAGE_WEBP: &str = "image/webp";

/// Check whether a declared content type names an image.
///
/// Only the declared type is inspected; the bytes are validated later by the
/// decoder. Comparison is case-insensitive.
pub fn is_image_type(mime: &str) -> bool {
    mime.trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
