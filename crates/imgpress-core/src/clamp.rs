//! Target dimension computation under a maximum bound.
//!
//! Images larger than the bound on either axis are scaled down so the
//! dominant axis lands exactly on the bound and the aspect ratio is kept as
//! closely as integer rounding allows. Smaller images are never upscaled.

use serde::{Deserialize, Serialize};

use crate::CompressError;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check whether either side is zero.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check whether both sides fit inside `bound`.
    #[inline]
    pub fn fits_within(self, bound: Dimensions) -> bool {
        self.width <= bound.width && self.height <= bound.height
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Compute the dimensions an image of `width` x `height` is drawn at.
///
/// # Errors
///
/// Returns `CompressError::DegenerateDimensions` if either input side is
/// zero, and `CompressError::InvalidConfig` if either side of `bound` is zero.
pub fn clamp_dimensions(
    width: u32,
    height: u32,
    bound: Dimensions,
) -> Result<Dimensions, CompressError> {
    if width == 0 || height == 0 {
        return Err(CompressError::DegenerateDimensions { width, height });
    }
    if bound.is_degenerate() {
        return Err(CompressError::InvalidConfig(format!(
            "maximum dimensions must be non-zero, got {}x{}",
            bound.width, bound.height
        )));
    }

    let natural = Dimensions::new(width, height);
    if natural.fits_within(bound) {
        return Ok(natural);
    }

    let (w, h) = (u64::from(width), u64::from(height));
    let (max_w, max_h) = (u64::from(bound.width), u64::from(bound.height));

    // Compare W/H against Mw/Mh without dividing.
    if w * max_h > h * max_w {
        Ok(Dimensions::new(bound.width, scale_side(max_w, h, w)))
    } else {
        Ok(Dimensions::new(scale_side(max_h, w, h), bound.height))
    }
}

/// `round(target * numerator / denominator)`, rounding halves up, at least 1.
fn scale_side(target: u64, numerator: u64, denominator: u64) -> u32 {
    // 2 * target * numerator needs up to 65 bits
    let (target, numerator, denominator) = (
        u128::from(target),
        u128::from(numerator),
        u128::from(denominator),
    );
    let scaled = (2 * target * numerator + denominator) / (2 * denominator);
    // scaled <= target, which came from a u32
    (scaled as u32).max(1)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const M: u32 = 2048;
    const BOUND: Dimensions = Dimensions::new(M, M);

    proptest! {
        /// Property: Images already inside the bound are returned unchanged.
        #[test]
        fn prop_identity_within_bound(w in 1u32..=M, h in 1u32..=M) {
            let dims = clamp_dimensions(w, h, BOUND).unwrap();
            prop_assert_eq!(dims, Dimensions::new(w, h));
        }

        /// Property: Oversized images land exactly on the bound along their
        /// dominant axis and never exceed it on the other.
        #[test]
        fn prop_dominant_axis_hits_bound(w in 1u32..=50_000, h in 1u32..=50_000) {
            prop_assume!(w.max(h) > M);
            let dims = clamp_dimensions(w, h, BOUND).unwrap();
            prop_assert_eq!(dims.width.max(dims.height), M);
            prop_assert!(dims.width >= 1 && dims.height >= 1);
        }

        /// Property: The scaled side is the nearest integer to the exact value.
        #[test]
        fn prop_aspect_ratio_nearest(w in 1u32..=50_000, h in 1u32..=50_000) {
            prop_assume!(w.max(h) > M);
            let dims = clamp_dimensions(w, h, BOUND).unwrap();
            let (w, h) = (i64::from(w), i64::from(h));
            let m = i64::from(M);

            if w > h {
                let exact_twice = 2 * m * h; // 2 * H' * W when exact
                let got_twice = 2 * i64::from(dims.height) * w;
                prop_assert!(
                    (got_twice - exact_twice).abs() <= w || dims.height == 1,
                    "height {} is not nearest for {}x{}", dims.height, w, h
                );
            } else {
                let exact_twice = 2 * m * w;
                let got_twice = 2 * i64::from(dims.width) * h;
                prop_assert!(
                    (got_twice - exact_twice).abs() <= h || dims.width == 1,
                    "width {} is not nearest for {}x{}", dims.width, w, h
                );
            }
        }

        /// Property: Any non-zero size and bound clamps into the bound.
        #[test]
        fn prop_full_range_stays_in_bound(
            w in 1u32..,
            h in 1u32..,
            max_w in 1u32..,
            max_h in 1u32..,
        ) {
            let bound = Dimensions::new(max_w, max_h);
            let dims = clamp_dimensions(w, h, bound).unwrap();
            prop_assert!(dims.fits_within(bound));
            prop_assert!(dims.width >= 1 && dims.height >= 1);
        }

        /// Property: Zero on either axis always errors instead of dividing.
        #[test]
        fn prop_zero_side_errors(other in 0u32..=100_000, zero_width in any::<bool>()) {
            let (w, h) = if zero_width { (0, other) } else { (other, 0) };
            let is_degenerate = matches!(
                clamp_dimensions(w, h, BOUND),
                Err(CompressError::DegenerateDimensions { .. })
            );
            prop_assert!(is_degenerate);
        }
    }
}
