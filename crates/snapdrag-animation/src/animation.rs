//! Frame-driven single-axis spring animation.
//!
//! An [`Animatable`] owns one `f32` value. `animate_to` starts a spring run
//! towards a target; every drained frame advances the simulation and
//! publishes the new value to the update listener. Starting another run,
//! snapping, or stopping supersedes the current run, whose end callback then
//! reports [`AnimationEndReason::Interrupted`].

use std::cell::RefCell;
use std::rc::Rc;

use snapdrag_core::{FrameCallbackRegistration, RuntimeHandle};

use crate::spring::{SpringParameter, SpringSimulation};

/// Why a spring run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEndReason {
    /// The value reached its target (or was forced onto it after the run
    /// exceeded its time budget).
    Finished,
    /// Another run, a snap, or an explicit stop replaced this run.
    Interrupted,
}

type EndCallback = Box<dyn FnOnce(AnimationEndReason)>;
type UpdateListener = Rc<RefCell<dyn FnMut(f32)>>;

pub struct Animatable {
    inner: Rc<RefCell<AnimatableInner>>,
}

struct AnimatableInner {
    runtime: RuntimeHandle,
    label: &'static str,
    current: f32,
    start: f32,
    target: f32,
    simulation: Option<SpringSimulation>,
    last_frame_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    on_end: Option<EndCallback>,
    on_update: Option<UpdateListener>,
}

impl AnimatableInner {
    /// Drop the running simulation and hand back its end callback.
    fn take_run(&mut self) -> Option<EndCallback> {
        if let Some(registration) = self.registration.take() {
            registration.cancel();
        }
        self.simulation = None;
        self.last_frame_nanos = None;
        self.on_end.take()
    }
}

impl Animatable {
    /// Create a new animatable with the given initial value.
    pub fn new(initial: f32, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            runtime,
            label: "animatable",
            current: initial,
            start: initial,
            target: initial,
            simulation: None,
            last_frame_nanos: None,
            registration: None,
            on_end: None,
            on_update: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Name used in log output.
    pub fn with_label(self, label: &'static str) -> Self {
        self.inner.borrow_mut().label = label;
        self
    }

    pub fn value(&self) -> f32 {
        self.inner.borrow().current
    }

    /// Return the current animation target.
    pub fn target(&self) -> f32 {
        self.inner.borrow().target
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().simulation.is_some()
    }

    /// Install the listener that receives every published value.
    pub fn set_on_update(&self, listener: impl FnMut(f32) + 'static) {
        self.inner.borrow_mut().on_update = Some(Rc::new(RefCell::new(listener)));
    }

    /// Spring towards `target`.
    ///
    /// `initial_velocity` is in progress units per second (physical velocity
    /// divided by the distance to travel). When the value already sits on the
    /// target, the run finishes immediately.
    pub fn animate_to(
        &self,
        target: f32,
        spring: SpringParameter,
        initial_velocity: f32,
        on_end: impl FnOnce(AnimationEndReason) + 'static,
    ) {
        let (superseded, already_there) = {
            let mut inner = self.inner.borrow_mut();
            let superseded = inner.take_run();
            inner.start = inner.current;
            inner.target = target;
            inner.on_end = Some(Box::new(on_end));
            let already_there = (target - inner.current).abs() <= f32::EPSILON;
            if !already_there {
                inner.simulation = Some(SpringSimulation::new(spring, initial_velocity));
            }
            log::debug!(
                "{}: spring {} -> {} (velocity {initial_velocity})",
                inner.label,
                inner.current,
                target
            );
            (superseded, already_there)
        };

        if let Some(callback) = superseded {
            callback(AnimationEndReason::Interrupted);
        }

        if already_there {
            Self::finish(&self.inner);
        } else {
            Self::schedule_frame(&self.inner);
        }
    }

    /// Snap immediately to `value`, interrupting any running spring.
    pub fn snap_to(&self, value: f32) {
        let superseded = {
            let mut inner = self.inner.borrow_mut();
            let superseded = inner.take_run();
            inner.current = value;
            inner.start = value;
            inner.target = value;
            superseded
        };
        if let Some(callback) = superseded {
            callback(AnimationEndReason::Interrupted);
        }
        Self::publish(&self.inner, value);
    }

    /// Stop where the value currently is.
    pub fn stop(&self) {
        let superseded = {
            let mut inner = self.inner.borrow_mut();
            inner.target = inner.current;
            inner.take_run()
        };
        if let Some(callback) = superseded {
            callback(AnimationEndReason::Interrupted);
        }
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner>>) {
        let runtime = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            inner.runtime.clone()
        };
        let weak = Rc::downgrade(this);
        let registration = runtime.frame_clock().with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        if !registration.is_active() {
            log::warn!("runtime is gone; finishing spring without animating");
            Self::finish(this);
            return;
        }
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner>>, frame_time_nanos: u64) {
        let (value, settled) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;

            let previous_frame = inner.last_frame_nanos.replace(frame_time_nanos);
            let start = inner.start;
            let target = inner.target;
            let label = inner.label;
            let Some(simulation) = inner.simulation.as_mut() else {
                return;
            };

            if let Some(previous) = previous_frame {
                let dt = frame_time_nanos.saturating_sub(previous) as f32 / 1_000_000_000.0;
                simulation.advance(dt);
            }

            let distance = target - start;
            let settled = simulation.is_settled(distance);
            if !settled && simulation.is_out_of_time() {
                log::warn!("{label}: spring did not settle within its time budget");
            }
            let settled = settled || simulation.is_out_of_time();
            let value = start + distance * simulation.progress();
            log::trace!("{label}: frame at {frame_time_nanos}ns -> {value}");
            inner.current = value;
            (value, settled)
        };

        if settled {
            Self::finish(this);
        } else {
            Self::publish(this, value);
            Self::schedule_frame(this);
        }
    }

    /// Land exactly on the target and report `Finished`.
    fn finish(this: &Rc<RefCell<AnimatableInner>>) {
        let (target, callback) = {
            let mut inner = this.borrow_mut();
            inner.current = inner.target;
            inner.start = inner.target;
            log::debug!("{}: settled at {}", inner.label, inner.target);
            (inner.target, inner.take_run())
        };
        Self::publish(this, target);
        if let Some(callback) = callback {
            callback(AnimationEndReason::Finished);
        }
    }

    fn publish(this: &Rc<RefCell<AnimatableInner>>, value: f32) {
        let listener = this.borrow().on_update.clone();
        if let Some(listener) = listener {
            // A listener that re-enters its own animatable is not re-invoked.
            if let Ok(mut listener) = listener.try_borrow_mut() {
                listener(value);
            }
        }
    }
}

impl Clone for Animatable {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
