#![forbid(unsafe_code)]

//! Fixed-duration eased interpolation between two absolute values.

use std::time::Duration;

use super::{Animation, Easing};

/// Interpolates `from → to` over `duration` along an [`Easing`] curve.
///
/// # Invariants
///
/// 1. `value()` equals `from` before the first tick and exactly `to` once
///    complete.
/// 2. A zero duration completes on the first tick, whatever its length.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
    ticked: bool,
}

impl Tween {
    /// Create a tween with linear easing.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::Linear,
            ticked: false,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Start value.
    #[inline]
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Target value.
    #[inline]
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return if self.ticked { 1.0 } else { 0.0 };
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.ticked = true;
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.ticked && self.elapsed >= self.duration
    }

    fn value(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.ticked = false;
    }
}
