//! Drag recognition on top of nested scroll containers.

mod arbitration;
mod simultaneous;
mod stickiness;

pub use arbitration::{
    pan_direction, ArbitrationConfig, DragEvent, DragValue, GestureArbiter, GesturePhase,
    PanDirection, TrackingSession,
};
pub use simultaneous::{
    should_recognize_simultaneously, GestureDescriptor, GestureKind, GestureMode,
    GesturePrecedence,
};
pub use stickiness::EdgeStickiness;
