//! Spring parameters and the damped harmonic oscillator that drives them.
//!
//! Springs are simulated in *progress space*: position 0 is the value the
//! animation started from, 1 is its target. Initial velocity is expressed in
//! progress units per second, i.e. physical velocity divided by the distance to
//! travel, which is what a release gesture hands over.

use std::f32::consts::PI;
use std::fmt;

/// Position threshold, in value units, under which a spring may settle.
pub const DEFAULT_POSITION_THRESHOLD: f32 = 0.01;

/// Velocity threshold, in value units per second, under which a spring may settle.
pub const DEFAULT_VELOCITY_THRESHOLD: f32 = 0.5;

/// Fastest spring accepted, as `sqrt(stiffness / mass) + damping / mass` in
/// 1/s. Stiffer springs would need sub-steps below 0.1 ms to stay stable.
pub const MAX_SPRING_RATE: f32 = 10_000.0;

/// Mass / stiffness / damping of an interpolating spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParameter {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParameterError {
    pub field: &'static str,
    pub value: f32,
}

impl fmt::Display for SpringParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid spring {}: {}", self.field, self.value)
    }
}

impl std::error::Error for SpringParameterError {}

impl SpringParameter {
    /// Validated constructor. Mass and stiffness must be finite and positive,
    /// damping finite and non-negative, and the spring no faster than
    /// [`MAX_SPRING_RATE`].
    pub fn new(mass: f32, stiffness: f32, damping: f32) -> Result<Self, SpringParameterError> {
        let spring = Self {
            mass,
            stiffness,
            damping,
        };
        spring.validate()?;
        Ok(spring)
    }

    pub fn validate(&self) -> Result<(), SpringParameterError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SpringParameterError { field, value })
            }
        };
        positive("mass", self.mass)?;
        positive("stiffness", self.stiffness)?;
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(SpringParameterError {
                field: "damping",
                value: self.damping,
            });
        }

        let natural = (self.stiffness / self.mass).sqrt();
        let decay = self.damping / self.mass;
        if !(natural + decay <= MAX_SPRING_RATE) {
            return Err(if natural >= decay {
                SpringParameterError {
                    field: "stiffness",
                    value: self.stiffness,
                }
            } else {
                SpringParameterError {
                    field: "damping",
                    value: self.damping,
                }
            });
        }
        Ok(())
    }

    /// `sqrt(stiffness / mass) + damping / mass`; the integrator keeps its
    /// sub-step below the inverse of this.
    pub fn rate(&self) -> f32 {
        (self.stiffness / self.mass).sqrt() + self.damping / self.mass
    }

    /// Firm, slightly under-damped spring used for snapping.
    pub fn hard() -> Self {
        Self {
            mass: 1.0,
            stiffness: 200.0,
            damping: 20.0,
        }
    }

    /// Short, heavily damped spring for tracking a finger.
    pub fn interactive() -> Self {
        Self::from_response(0.15, 0.86)
    }

    /// Critically damped spring that settles in roughly `response` seconds.
    pub fn smooth(response: f32) -> Self {
        Self::from_response(response, 1.0)
    }

    /// Convert a (response, damping fraction) description into physical
    /// parameters for a unit mass.
    pub fn from_response(response: f32, damping_fraction: f32) -> Self {
        let response = response.max(f32::EPSILON);
        let angular = 2.0 * PI / response;
        Self {
            mass: 1.0,
            stiffness: angular * angular,
            damping: 4.0 * PI * damping_fraction / response,
        }
    }

    /// Damping ratio: 1 is critical, below 1 bounces.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

impl Default for SpringParameter {
    fn default() -> Self {
        Self::hard()
    }
}

/// One spring run in progress space.
#[derive(Debug, Clone, Copy)]
pub struct SpringSimulation {
    spring: SpringParameter,
    progress: f32,
    velocity: f32,
    elapsed_nanos: u64,
}

impl SpringSimulation {
    /// Upper bound on simulated time. A run that has not settled by then is
    /// forced onto its target.
    pub const MAX_DURATION_NANOS: u64 = 20_000_000_000;

    /// Longest integration sub-step.
    const TIMESTEP: f32 = 1.0 / 240.0;

    /// Shortest sub-step, matching [`MAX_SPRING_RATE`].
    const MIN_TIMESTEP: f32 = 1.0 / MAX_SPRING_RATE;

    pub fn new(spring: SpringParameter, initial_velocity: f32) -> Self {
        Self {
            spring,
            progress: 0.0,
            velocity: if initial_velocity.is_finite() {
                initial_velocity
            } else {
                0.0
            },
            elapsed_nanos: 0,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Current velocity in progress units per second.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn elapsed_nanos(&self) -> u64 {
        self.elapsed_nanos
    }

    /// Advance the oscillator by `dt` seconds using semi-implicit Euler.
    ///
    /// Time past [`MAX_DURATION_NANOS`](Self::MAX_DURATION_NANOS) is not
    /// simulated, so a jump in the frame clock costs a bounded number of steps.
    pub fn advance(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        let remaining = Self::MAX_DURATION_NANOS.saturating_sub(self.elapsed_nanos);
        let dt_nanos = ((dt as f64 * 1_000_000_000.0) as u64).min(remaining);
        if dt_nanos == 0 {
            return;
        }
        self.elapsed_nanos += dt_nanos;

        let SpringParameter {
            mass,
            stiffness,
            damping,
        } = self.spring;
        let rate = self.spring.rate();
        let max_step = if rate.is_finite() && rate > 0.0 {
            (1.0 / rate).clamp(Self::MIN_TIMESTEP, Self::TIMESTEP)
        } else {
            Self::MIN_TIMESTEP
        };
        let dt = dt_nanos as f32 / 1_000_000_000.0;
        let steps = (dt / max_step).ceil().max(1.0) as u32;
        let step = dt / steps as f32;

        for _ in 0..steps {
            let displacement = self.progress - 1.0;
            let force = -stiffness * displacement - damping * self.velocity;
            self.velocity += force / mass * step;
            self.progress += self.velocity * step;
            if !self.progress.is_finite() || !self.velocity.is_finite() {
                break;
            }
        }

        if !self.progress.is_finite() || !self.velocity.is_finite() {
            log::warn!("spring diverged, forcing it onto its target");
            self.progress = 1.0;
            self.velocity = 0.0;
        }
    }

    /// Whether the run may stop, given the absolute distance it covers.
    pub fn is_settled(&self, distance: f32) -> bool {
        let distance = distance.abs();
        if distance <= f32::EPSILON {
            return true;
        }
        let remaining = (1.0 - self.progress).abs() * distance;
        let speed = self.velocity.abs() * distance;
        remaining < DEFAULT_POSITION_THRESHOLD && speed < DEFAULT_VELOCITY_THRESHOLD
    }

    pub fn is_out_of_time(&self) -> bool {
        self.elapsed_nanos >= Self::MAX_DURATION_NANOS
    }
}
