//! Spring animation for snapdrag
//!
//! Velocity-seeded interpolating springs, stepped by the frame runtime in
//! `snapdrag-core`.

mod animation;
pub mod spring;

pub use animation::{Animatable, AnimationEndReason};
pub use spring::{SpringParameter, SpringParameterError, SpringSimulation, MAX_SPRING_RATE};
