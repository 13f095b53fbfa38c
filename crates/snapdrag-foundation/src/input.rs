//! Pointer samples as delivered by the host's drag recognizer.

use snapdrag_ui_graphics::{Offset, Point, Velocity};

/// Recognizer state attached to each sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognizerPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl RecognizerPhase {
    /// Whether this phase closes the gesture.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RecognizerPhase::Ended | RecognizerPhase::Cancelled | RecognizerPhase::Failed
        )
    }
}

/// One frame of pointer input.
///
/// `translation` is cumulative since the gesture began. `velocity` is the
/// host's instantaneous estimate, when it has one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub start_location: Point,
    pub location: Point,
    pub translation: Offset,
    pub velocity: Option<Velocity>,
    pub phase: RecognizerPhase,
    pub uptime_millis: i64,
}

impl PointerSample {
    pub fn new(phase: RecognizerPhase, start_location: Point, translation: Offset) -> Self {
        Self {
            start_location,
            location: Point::new(
                start_location.x + translation.width,
                start_location.y + translation.height,
            ),
            translation,
            velocity: None,
            phase,
            uptime_millis: 0,
        }
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn at(mut self, uptime_millis: i64) -> Self {
        self.uptime_millis = uptime_millis;
        self
    }
}
