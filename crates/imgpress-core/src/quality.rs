//! Quality fraction handed to the encoding policy.

use serde::{Deserialize, Serialize};

use crate::CompressError;

/// Lossy-encoder quality in the half-open range (0, 1].
///
/// Higher values keep more fidelity. The slider presents this as a whole
/// percentage, see [`Quality::from_percent`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Quality(f32);

impl Quality {
    /// Highest quality (1.0).
    pub const MAX: Quality = Quality(1.0);

    /// Create a quality fraction, rejecting NaN and values outside (0, 1].
    pub fn new(value: f32) -> Result<Self, CompressError> {
        if value.is_nan() || value <= 0.0 || value > 1.0 {
            return Err(CompressError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    /// Map a slider percentage to a fraction.
    ///
    /// The slider range is 1-100; out-of-range values are clamped to it.
    pub fn from_percent(percent: u8) -> Self {
        Self(f32::from(percent.clamp(1, 100)) / 100.0)
    }

    /// The raw fraction.
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// The larger of this quality and `floor`.
    ///
    /// `floor` values outside (0, 1] are clamped into range.
    pub fn at_least(self, floor: f32) -> Self {
        let floor = if floor.is_nan() { 0.0 } else { floor.min(1.0) };
        if floor > self.0 {
            Self(floor)
        } else {
            self
        }
    }

    /// Scale to the 1-100 integer range used by JPEG encoders.
    pub fn to_percent(self) -> u8 {
        ((self.0 * 100.0).round() as u8).clamp(1, 100)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.8)
    }
}

impl TryFrom<f32> for Quality {
    type Error = CompressError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl From<Quality> for f32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}
