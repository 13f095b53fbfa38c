use bitflags::bitflags;

use crate::error::ConfigError;
use crate::rubber_band::rubber_band;

bitflags! {
    /// Axes along which an element may be dragged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Axes: u8 {
        const HORIZONTAL = 1 << 0;
        const VERTICAL = 1 << 1;
    }
}

impl Default for Axes {
    fn default() -> Self {
        Axes::all()
    }
}

/// Allowed offset range along one axis, with the rubber band applied past it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    min: f32,
    max: f32,
    band_length: f32,
}

impl Boundary {
    /// No limits in either direction.
    pub const INFINITE: Boundary = Boundary {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
        band_length: 0.0,
    };

    pub fn new(min: f32, max: f32, band_length: f32) -> Result<Self, ConfigError> {
        if min.is_nan() || max.is_nan() || !band_length.is_finite() {
            return Err(ConfigError::NonFiniteBoundary);
        }
        if min > max {
            return Err(ConfigError::InvertedBoundary { min, max });
        }
        if band_length < 0.0 {
            return Err(ConfigError::NegativeBandLength(band_length));
        }
        Ok(Self {
            min,
            max,
            band_length,
        })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn band_length(&self) -> f32 {
        self.band_length
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Rubber-band `value` against this boundary.
    pub fn apply(&self, value: f32) -> f32 {
        rubber_band(value, self.min, self.max, self.band_length)
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::INFINITE
    }
}
