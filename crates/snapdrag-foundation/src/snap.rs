//! Release handling: pick a rest position and spring to it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use snapdrag_animation::{Animatable, AnimationEndReason, SpringParameter};
use snapdrag_core::RuntimeHandle;
use snapdrag_ui_graphics::{Offset, Size, Velocity};

use crate::detent::DetentSet;

/// Chooses where a released element comes to rest.
///
/// The velocity may be adjusted in place; the adjusted value seeds the
/// spring.
pub trait SnapDecision {
    fn target(&mut self, velocity: &mut Velocity, offset: Offset, content_size: Size) -> Offset;
}

impl<F> SnapDecision for F
where
    F: FnMut(&mut Velocity, Offset, Size) -> Offset,
{
    fn target(&mut self, velocity: &mut Velocity, offset: Offset, content_size: Size) -> Offset {
        self(velocity, offset, content_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapAxis {
    Horizontal,
    Vertical,
}

/// Snaps one axis to the closest detent, leaving the other untouched.
#[derive(Debug, Clone)]
pub struct NearestDetent {
    pub detents: DetentSet,
    pub axis: SnapAxis,
}

impl NearestDetent {
    pub fn new(detents: DetentSet, axis: SnapAxis) -> Self {
        Self { detents, axis }
    }
}

impl SnapDecision for NearestDetent {
    fn target(&mut self, _velocity: &mut Velocity, offset: Offset, _content_size: Size) -> Offset {
        let mut target = offset;
        match self.axis {
            SnapAxis::Horizontal => target.width = self.detents.nearest(offset.width).offset,
            SnapAxis::Vertical => target.height = self.detents.nearest(offset.height).offset,
        }
        target
    }
}

/// Physical velocity to spring velocity: units per second over the distance
/// left to travel. Zero distance or a non-finite result maps to zero.
pub fn map_velocity(velocity: Velocity, distance: Offset) -> Velocity {
    Velocity {
        dx: map_axis(velocity.dx, distance.width),
        dy: map_axis(velocity.dy, distance.height),
    }
}

fn map_axis(velocity: f32, distance: f32) -> f32 {
    if distance == 0.0 {
        return 0.0;
    }
    let mapped = velocity / distance;
    if mapped.is_finite() {
        mapped
    } else {
        log::warn!("non-finite spring velocity ({velocity} over {distance}); using zero");
        0.0
    }
}

/// Fires its callback when both axes report `Finished`.
struct Join {
    remaining: Cell<u8>,
    on_complete: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Join {
    fn new(on_complete: impl FnOnce() + 'static) -> Rc<Self> {
        Rc::new(Self {
            remaining: Cell::new(2),
            on_complete: RefCell::new(Some(Box::new(on_complete))),
        })
    }

    fn axis_ended(&self, reason: AnimationEndReason) {
        if reason != AnimationEndReason::Finished {
            return;
        }
        let remaining = self.remaining.get().saturating_sub(1);
        self.remaining.set(remaining);
        if remaining == 0 {
            let callback = self.on_complete.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
        }
    }
}

type OffsetListener = Rc<RefCell<Option<Box<dyn FnMut(Offset)>>>>;

/// Two independent axis springs driving one element offset.
///
/// A new release or a `snap_to` supersedes whatever is running; superseded
/// runs never report completion.
pub struct SnapEngine {
    x: Animatable,
    y: Animatable,
    spring: SpringParameter,
    current: Rc<Cell<Offset>>,
    listener: OffsetListener,
}

impl SnapEngine {
    pub fn new(initial: Offset, spring: SpringParameter, runtime: RuntimeHandle) -> Self {
        let current = Rc::new(Cell::new(initial));
        let listener: OffsetListener = Rc::new(RefCell::new(None));

        let x = Animatable::new(initial.width, runtime.clone()).with_label("snap-x");
        let y = Animatable::new(initial.height, runtime).with_label("snap-y");

        {
            let current = Rc::clone(&current);
            let listener = Rc::clone(&listener);
            x.set_on_update(move |width| {
                let mut offset = current.get();
                offset.width = width;
                current.set(offset);
                emit(&listener, offset);
            });
        }
        {
            let current = Rc::clone(&current);
            let listener = Rc::clone(&listener);
            y.set_on_update(move |height| {
                let mut offset = current.get();
                offset.height = height;
                current.set(offset);
                emit(&listener, offset);
            });
        }

        Self {
            x,
            y,
            spring,
            current,
            listener,
        }
    }

    pub fn spring(&self) -> SpringParameter {
        self.spring
    }

    pub fn set_spring(&mut self, spring: SpringParameter) {
        self.spring = spring;
    }

    /// Receive every published offset, during drags and springs alike.
    pub fn set_on_update(&self, listener: impl FnMut(Offset) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    pub fn offset(&self) -> Offset {
        Offset::new(self.x.value(), self.y.value())
    }

    pub fn target(&self) -> Offset {
        Offset::new(self.x.target(), self.y.target())
    }

    pub fn is_animating(&self) -> bool {
        self.x.is_running() || self.y.is_running()
    }

    /// Jump to `offset`, interrupting any spring.
    pub fn snap_to(&self, offset: Offset) {
        self.x.snap_to(offset.width);
        self.y.snap_to(offset.height);
        self.current.set(offset);
    }

    pub fn stop(&self) {
        self.x.stop();
        self.y.stop();
    }

    /// Ask `decision` for a target and spring there from `offset`.
    ///
    /// Returns the chosen target. `on_complete` runs once both axes settle.
    pub fn release(
        &self,
        offset: Offset,
        velocity: Velocity,
        content_size: Size,
        decision: &mut dyn SnapDecision,
        on_complete: impl FnOnce() + 'static,
    ) -> Offset {
        let mut velocity = velocity;
        let target = decision.target(&mut velocity, offset, content_size);
        log::debug!("release at {offset:?} with {velocity:?}: target {target:?}");

        if self.offset() != offset {
            self.snap_to(offset);
        }
        self.settle(target, velocity, on_complete);
        target
    }

    /// Spring from the current offset to `target`, seeded with the physical
    /// release `velocity`.
    pub fn settle(&self, target: Offset, velocity: Velocity, on_complete: impl FnOnce() + 'static) {
        let distance = target - self.offset();
        let mapped = map_velocity(velocity, distance);
        let join = Join::new(on_complete);

        {
            let join = Rc::clone(&join);
            self.x
                .animate_to(target.width, self.spring, mapped.dx, move |reason| {
                    join.axis_ended(reason)
                });
        }
        self.y
            .animate_to(target.height, self.spring, mapped.dy, move |reason| {
                join.axis_ended(reason)
            });
    }
}

fn emit(listener: &OffsetListener, offset: Offset) {
    // A listener re-entering the engine is not re-invoked.
    if let Ok(mut listener) = listener.try_borrow_mut() {
        if let Some(listener) = listener.as_mut() {
            listener(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detent::{Detent, DetentContext};
    use snapdrag_core::{Runtime, FRAME_NANOS_60HZ};

    fn pump(runtime: &Runtime, frames: usize) {
        let handle = runtime.handle();
        let mut time = handle.last_frame_nanos().unwrap_or(0);
        for _ in 0..frames {
            if !handle.has_frame_callbacks() {
                break;
            }
            time += FRAME_NANOS_60HZ;
            handle.drain_frame_callbacks(time);
        }
    }

    #[test]
    fn velocity_mapping_divides_by_distance() {
        let mapped = map_velocity(Velocity::new(100.0, -300.0), Offset::new(50.0, 100.0));
        assert_eq!(mapped, Velocity::new(2.0, -3.0));
    }

    #[test]
    fn zero_distance_maps_to_zero_velocity() {
        let mapped = map_velocity(Velocity::new(800.0, 5.0), Offset::new(0.0, 1.0e-40));
        assert_eq!(mapped.dx, 0.0);
        assert!(mapped.dy.is_finite());
        assert_eq!(mapped.dy, 0.0);
    }

    #[test]
    fn nearest_detent_snaps_the_selected_axis() {
        let detents = DetentSet::resolve(
            &[
                Detent::CONTENT,
                Detent::fraction(0.8).unwrap(),
                Detent::fraction(1.0).unwrap(),
            ],
            &DetentContext {
                max_detent_value: 500.0,
                content_height: 200.0,
            },
        )
        .unwrap();
        let mut decision = NearestDetent::new(detents, SnapAxis::Vertical);
        let mut velocity = Velocity::ZERO;
        let target = decision.target(&mut velocity, Offset::new(13.0, 420.0), Size::ZERO);
        assert_eq!(target, Offset::new(13.0, 400.0));
    }

    #[test]
    fn release_completes_once_after_both_axes() {
        let runtime = Runtime::new();
        let engine = SnapEngine::new(Offset::ZERO, SpringParameter::hard(), runtime.handle());
        let completions = Rc::new(Cell::new(0));

        let mut decision = |_: &mut Velocity, _: Offset, _: Size| Offset::new(100.0, -40.0);
        {
            let completions = Rc::clone(&completions);
            let target = engine.release(
                Offset::new(10.0, 10.0),
                Velocity::new(200.0, 0.0),
                Size::new(300.0, 80.0),
                &mut decision,
                move || completions.set(completions.get() + 1),
            );
            assert_eq!(target, Offset::new(100.0, -40.0));
        }
        assert!(engine.is_animating());
        pump(&runtime, 3);
        assert_eq!(completions.get(), 0);

        pump(&runtime, 600);
        assert_eq!(completions.get(), 1);
        assert_eq!(engine.offset(), Offset::new(100.0, -40.0));
    }

    #[test]
    fn release_on_target_completes_immediately() {
        let runtime = Runtime::new();
        let engine = SnapEngine::new(Offset::ZERO, SpringParameter::hard(), runtime.handle());
        let completed = Rc::new(Cell::new(false));

        let mut decision = |_: &mut Velocity, offset: Offset, _: Size| offset;
        {
            let completed = Rc::clone(&completed);
            engine.release(
                Offset::new(5.0, 5.0),
                Velocity::new(1_000.0, 1_000.0),
                Size::ZERO,
                &mut decision,
                move || completed.set(true),
            );
        }
        assert!(completed.get());
        assert!(!engine.is_animating());
    }

    #[test]
    fn superseded_release_never_completes() {
        let runtime = Runtime::new();
        let engine = SnapEngine::new(Offset::ZERO, SpringParameter::hard(), runtime.handle());
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        {
            let first = Rc::clone(&first);
            engine.settle(Offset::new(200.0, 200.0), Velocity::ZERO, move || {
                first.set(first.get() + 1)
            });
        }
        pump(&runtime, 5);
        {
            let second = Rc::clone(&second);
            engine.settle(Offset::ZERO, Velocity::ZERO, move || {
                second.set(second.get() + 1)
            });
        }
        pump(&runtime, 600);

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(engine.offset(), Offset::ZERO);
    }

    #[test]
    fn position_stream_reports_both_axes() {
        let runtime = Runtime::new();
        let engine = SnapEngine::new(Offset::ZERO, SpringParameter::hard(), runtime.handle());
        let last = Rc::new(Cell::new(Offset::ZERO));
        {
            let last = Rc::clone(&last);
            engine.set_on_update(move |offset| last.set(offset));
        }

        engine.snap_to(Offset::new(3.0, 4.0));
        assert_eq!(last.get(), Offset::new(3.0, 4.0));

        engine.settle(Offset::new(-20.0, 60.0), Velocity::ZERO, || {});
        pump(&runtime, 600);
        assert_eq!(last.get(), Offset::new(-20.0, 60.0));
    }
}
