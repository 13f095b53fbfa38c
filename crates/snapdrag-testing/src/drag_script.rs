//! Scripted pointer input.

use snapdrag_foundation::{PointerSample, RecognizerPhase};
use snapdrag_ui_graphics::{Offset, Point, Velocity};

/// Builds the sample stream of one drag, one sample per frame.
///
/// ```
/// use snapdrag_testing::DragScript;
///
/// let samples = DragScript::new(10.0, 10.0).move_by(0.0, -5.0).move_by(0.0, -5.0).end();
/// assert_eq!(samples.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct DragScript {
    start: Point,
    translation: Offset,
    time_ms: i64,
    frame_ms: i64,
    samples: Vec<PointerSample>,
}

impl DragScript {
    /// Start a drag at `(x, y)` with a `Began` sample at zero translation.
    pub fn new(x: f32, y: f32) -> Self {
        let start = Point::new(x, y);
        Self {
            start,
            translation: Offset::ZERO,
            time_ms: 0,
            frame_ms: 16,
            samples: vec![PointerSample::new(RecognizerPhase::Began, start, Offset::ZERO)],
        }
    }

    pub fn frame_interval(mut self, frame_ms: i64) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    pub fn move_by(self, dx: f32, dy: f32) -> Self {
        let translation = self.translation + Offset::new(dx, dy);
        self.move_to(translation.width, translation.height)
    }

    /// Move to a cumulative translation.
    pub fn move_to(mut self, width: f32, height: f32) -> Self {
        self.translation = Offset::new(width, height);
        self.time_ms += self.frame_ms;
        let sample = PointerSample::new(RecognizerPhase::Changed, self.start, self.translation)
            .at(self.time_ms);
        self.samples.push(sample);
        self
    }

    /// `frames` equal steps of `(dx, dy)`.
    pub fn moves(mut self, frames: usize, dx: f32, dy: f32) -> Self {
        for _ in 0..frames {
            self = self.move_by(dx, dy);
        }
        self
    }

    pub fn end(self) -> Vec<PointerSample> {
        self.finish(RecognizerPhase::Ended, None)
    }

    pub fn end_with_velocity(self, dx: f32, dy: f32) -> Vec<PointerSample> {
        self.finish(RecognizerPhase::Ended, Some(Velocity::new(dx, dy)))
    }

    pub fn cancel(self) -> Vec<PointerSample> {
        self.finish(RecognizerPhase::Cancelled, None)
    }

    /// Samples so far, without a terminal sample.
    pub fn samples(&self) -> &[PointerSample] {
        &self.samples
    }

    fn finish(mut self, phase: RecognizerPhase, velocity: Option<Velocity>) -> Vec<PointerSample> {
        self.time_ms += self.frame_ms;
        let mut sample = PointerSample::new(phase, self.start, self.translation).at(self.time_ms);
        sample.velocity = velocity;
        self.samples.push(sample);
        self.samples
    }
}
