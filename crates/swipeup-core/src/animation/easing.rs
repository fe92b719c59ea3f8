#![forbid(unsafe_code)]

//! Easing curves for commit animations.
//!
//! Every curve maps normalized time `t` in `[0, 1]` to eased progress with
//! `apply(0) == 0` and `apply(1) == 1`. Curves that report
//! [`Easing::can_overshoot`] may leave `[0, 1]` in between; that is where the
//! springy feel of a commit comes from.

use std::f64::consts::{FRAC_PI_2, PI};

/// Easing curve shared by all channels of a commit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Cubic ease-in (accelerating).
    EaseIn,
    /// Cubic ease-out (decelerating).
    EaseOut,
    /// Cubic S-curve.
    EaseInOut,
    /// Back ease-out: one small overshoot, then settle.
    Back,
    /// Damped oscillation around the target.
    ///
    /// `bounciness` scales the oscillation frequency; `0` degenerates to a
    /// plain ease-out, `1` overshoots by roughly 6% once.
    Elastic {
        /// Oscillation factor (clamped to `>= 0`).
        bounciness: f64,
    },
}

impl Default for Easing {
    fn default() -> Self {
        Self::Elastic { bounciness: 1.0 }
    }
}

impl Easing {
    /// Apply the curve to `t` (clamped to `[0, 1]`).
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Self::Back => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + c1 * u * u
            }
            Self::Elastic { bounciness } => {
                if t >= 1.0 {
                    return 1.0;
                }
                let freq = bounciness.max(0.0) * PI;
                let envelope = (t * FRAC_PI_2).cos();
                1.0 - envelope * envelope * envelope * (t * freq).cos()
            }
        }
    }

    /// Whether the curve can produce values outside `[0, 1]`.
    pub fn can_overshoot(self) -> bool {
        match self {
            Self::Back => true,
            Self::Elastic { bounciness } => bounciness > 0.5,
            Self::Linear | Self::EaseIn | Self::EaseOut | Self::EaseInOut => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Back,
        Easing::Elastic { bounciness: 1.0 },
        Easing::Elastic { bounciness: 0.0 },
    ];

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-12, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{easing:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.apply(-3.0), easing.apply(0.0));
            assert_eq!(easing.apply(7.0), easing.apply(1.0));
            assert_eq!(easing.apply(f64::NAN), easing.apply(0.0));
        }
    }

    #[test]
    fn elastic_overshoots_target() {
        let elastic = Easing::default();
        assert!(elastic.can_overshoot());
        let peak = (0..=100)
            .map(|i| elastic.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.05, "peak was {peak}");
    }

    #[test]
    fn non_overshooting_curves_stay_in_unit_range() {
        for easing in ALL.iter().filter(|e| !e.can_overshoot()) {
            for i in 0..=100 {
                let v = easing.apply(i as f64 / 100.0);
                assert!((-1e-12..=1.0 + 1e-12).contains(&v), "{easing:?} gave {v}");
            }
        }
    }

    #[test]
    fn ease_out_leads_linear_at_midpoint() {
        assert!(Easing::EaseOut.apply(0.5) > Easing::Linear.apply(0.5));
        assert!(Easing::EaseIn.apply(0.5) < Easing::Linear.apply(0.5));
    }
}
