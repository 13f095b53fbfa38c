use snapdrag_animation::SpringParameterError;
use std::fmt;

/// Malformed configuration, rejected at construction time.
///
/// Nothing else in the engine produces errors: runtime anomalies all have a
/// local recovery.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvertedBoundary { min: f32, max: f32 },
    NegativeBandLength(f32),
    NonFiniteBoundary,
    InvalidSpring { field: &'static str, value: f32 },
    InvalidFraction(f32),
    InvalidHeight(f32),
    EmptyDetents,
    NegativeMinimumDistance(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvertedBoundary { min, max } => {
                write!(f, "boundary min {min} is greater than max {max}")
            }
            ConfigError::NegativeBandLength(length) => {
                write!(f, "band length must not be negative, got {length}")
            }
            ConfigError::NonFiniteBoundary => {
                write!(f, "boundary contains NaN or an infinite band length")
            }
            ConfigError::InvalidSpring { field, value } => {
                write!(f, "invalid spring {field}: {value}")
            }
            ConfigError::InvalidFraction(fraction) => {
                write!(f, "detent fraction must be within 0..=1, got {fraction}")
            }
            ConfigError::InvalidHeight(height) => {
                write!(f, "detent height must be finite and non-negative, got {height}")
            }
            ConfigError::EmptyDetents => write!(f, "at least one detent is required"),
            ConfigError::NegativeMinimumDistance(distance) => {
                write!(f, "minimum activation distance must not be negative, got {distance}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<SpringParameterError> for ConfigError {
    fn from(error: SpringParameterError) -> Self {
        ConfigError::InvalidSpring {
            field: error.field,
            value: error.value,
        }
    }
}
