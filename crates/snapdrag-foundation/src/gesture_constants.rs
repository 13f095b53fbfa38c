//! Shared gesture constants.
//!
//! Values are in logical pixels (and logical pixels per second for
//! velocities).

/// Width of the band along an edge that can start a drag when activation is
/// restricted to edges.
pub const EDGE_ACTIVATION_WIDTH: f32 = 20.0;

/// Rubber band length applied when a blanket is pulled below its resting
/// position.
pub const BLANKET_BAND_LENGTH: f32 = 50.0;

/// Downward release velocity beyond which a moved blanket hides.
pub const BLANKET_DISMISS_VELOCITY: f32 = 50.0;

/// Downward displacement beyond which a released blanket hides.
pub const BLANKET_DISMISS_DISTANCE: f32 = 50.0;

/// Response, in seconds, of the spring used to present and hide a blanket.
pub const BLANKET_PRESENT_RESPONSE: f32 = 0.45;

/// Fraction of the available height used by the default middle detent.
pub const BLANKET_LARGE_FRACTION: f32 = 0.8;
