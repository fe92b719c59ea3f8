#![forbid(unsafe_code)]

//! Damped spring driver for commit animations.
//!
//! A [`Spring`] pulls a channel toward an absolute target with
//!
//!   a = -stiffness × (x - target) - damping × v
//!
//! integrated with semi-implicit Euler in steps of at most 4ms. Unlike a
//! [`Tween`](super::Tween) it has no fixed duration: it completes when both
//! the displacement and the velocity drop below their rest thresholds, at
//! which point the position snaps exactly onto the target.
//!
//! A spring can start with a non-zero velocity, which lets a commit continue
//! the finger's motion at release instead of restarting from rest.
//!
//! # Invariants
//!
//! 1. `value()` is the raw position; channel values are not normalized.
//! 2. Once at rest, `value() == target()` exactly, and further ticks are
//!    no-ops until `reset()`.
//! 3. Stiffness lies in `[MIN_STIFFNESS, MAX_STIFFNESS]` and damping in
//!    `[0, MAX_DAMPING]`, which keeps the 4ms step stable.
//! 4. A spring runs for at most [`MAX_SETTLE`]. Past that, or if the
//!    position stops being finite, it snaps onto the target and rests.

use std::time::Duration;

use super::Animation;

/// Largest integration step, in seconds.
const MAX_STEP_SECS: f64 = 0.004;

/// Smallest accepted stiffness.
pub const MIN_STIFFNESS: f64 = 0.1;

/// Largest accepted stiffness.
pub const MAX_STIFFNESS: f64 = 10_000.0;

/// Largest accepted damping.
pub const MAX_DAMPING: f64 = 400.0;

/// Simulated time after which a spring snaps onto its target.
pub const MAX_SETTLE: Duration = Duration::from_secs(10);

/// Default stiffness: quick, slightly underdamped with the default damping.
pub const DEFAULT_STIFFNESS: f64 = 170.0;

/// Default damping.
pub const DEFAULT_DAMPING: f64 = 26.0;

/// A damped harmonic oscillator driving one channel.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    initial_velocity: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    elapsed: Duration,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `initial`, pulled toward `target`, starting at rest.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            initial_velocity: 0.0,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            rest_threshold: 0.001,
            velocity_threshold: 0.01,
            elapsed: Duration::ZERO,
            at_rest: false,
        }
    }

    /// Set stiffness (builder pattern). Clamped to
    /// `[MIN_STIFFNESS, MAX_STIFFNESS]`; NaN falls back to the default.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = if k.is_nan() {
            DEFAULT_STIFFNESS
        } else {
            k.clamp(MIN_STIFFNESS, MAX_STIFFNESS)
        };
        self
    }

    /// Set damping (builder pattern). Clamped to `[0, MAX_DAMPING]`; NaN
    /// falls back to the default.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = if c.is_nan() {
            DEFAULT_DAMPING
        } else {
            c.clamp(0.0, MAX_DAMPING)
        };
        self
    }

    /// Set the starting velocity in units per second (builder pattern).
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self.initial_velocity = velocity;
        self
    }

    /// Set the displacement and velocity below which the spring rests.
    #[must_use]
    pub fn with_rest_thresholds(mut self, position: f64, velocity: f64) -> Self {
        self.rest_threshold = position.abs();
        self.velocity_threshold = velocity.abs();
        self
    }

    /// Raw position.
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity in units per second.
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Stiffness parameter.
    #[inline]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Damping parameter.
    #[inline]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    fn step(&mut self, dt: f64) {
        let acceleration =
            -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    fn settle_if_resting(&mut self) {
        let resting = (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold;
        let diverged = !self.position.is_finite() || !self.velocity.is_finite();
        if resting || diverged || self.elapsed >= MAX_SETTLE {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let dt = dt.min(MAX_SETTLE.saturating_sub(self.elapsed));
        self.elapsed += dt;
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            self.step(step);
            remaining -= step;
        }
        self.settle_if_resting();
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        self.position
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = self.initial_velocity;
        self.elapsed = Duration::ZERO;
        self.at_rest = false;
    }
}
