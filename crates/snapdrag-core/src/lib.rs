//! Core runtime for snapdrag
//!
//! A deliberately small, single-threaded runtime: frame callbacks are
//! registered through a [`FrameClock`] and drained by the host once per
//! display frame. Everything that animates (springs, snap settles) is driven
//! from here, so tests can step time deterministically.

pub mod collections;
mod frame_clock;
pub mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{Clock, MonotonicClock, RuntimeScheduler};
pub use runtime::{FrameCallbackId, Runtime, RuntimeHandle};

/// Nanoseconds in one frame at 60 FPS, handy for hosts and tests stepping time.
pub const FRAME_NANOS_60HZ: u64 = 16_666_667;

pub mod prelude {
    pub use crate::frame_clock::{FrameCallbackRegistration, FrameClock};
    pub use crate::runtime::{Runtime, RuntimeHandle};
}
