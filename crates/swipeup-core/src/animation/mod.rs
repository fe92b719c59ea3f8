#![forbid(unsafe_code)]

//! Animation drivers for panel channels.
//!
//! Every driver implements [`Animation`]: it is advanced by the host with
//! [`Animation::tick`], reports its current absolute value, and says when it
//! has settled. A [`ChannelBatch`] runs one driver per channel and reports a
//! single completion once all of them settle.
//!
//! [`CommitMotion`] describes which driver a commit uses:
//!
//! | Motion | Driver | Completes |
//! |--------|--------|-----------|
//! | `Tween { duration, easing }` | [`Tween`] | after `duration` |
//! | `Spring { stiffness, damping }` | [`Spring`] | when at rest |

use std::time::Duration;

mod batch;
mod easing;
pub mod spring;
mod tween;

pub use batch::{BatchStatus, ChannelBatch};
pub use easing::Easing;
pub use spring::Spring;
pub use tween::Tween;

use crate::channel::Channel;

/// A time-driven value.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the driver has settled on its target.
    fn is_complete(&self) -> bool;

    /// Current absolute value.
    fn value(&self) -> f64;

    /// Rewind to the starting state.
    fn reset(&mut self);
}

/// Default commit duration.
pub const DEFAULT_COMMIT_DURATION: Duration = Duration::from_millis(200);

/// How a commit animation moves channels to their resting values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CommitMotion {
    /// Fixed-duration interpolation along a shared easing curve.
    Tween {
        /// Shared duration of every channel.
        #[cfg_attr(feature = "serde", serde(rename = "duration_ms", with = "duration_ms"))]
        duration: Duration,
        /// Shared easing curve.
        easing: Easing,
    },
    /// Physically based motion; the panel offset inherits release velocity.
    Spring {
        /// Spring stiffness.
        stiffness: f64,
        /// Spring damping.
        damping: f64,
    },
}

impl Default for CommitMotion {
    fn default() -> Self {
        Self::Tween {
            duration: DEFAULT_COMMIT_DURATION,
            easing: Easing::default(),
        }
    }
}

impl CommitMotion {
    /// Spring motion with the default parameters.
    #[must_use]
    pub fn spring() -> Self {
        Self::Spring {
            stiffness: spring::DEFAULT_STIFFNESS,
            damping: spring::DEFAULT_DAMPING,
        }
    }

    /// Build the driver for one channel.
    ///
    /// `velocity` is in channel units per second; tweens ignore it.
    pub fn driver(&self, channel: Channel, from: f64, to: f64, velocity: f64) -> Box<dyn Animation> {
        match *self {
            Self::Tween { duration, easing } => {
                Box::new(Tween::new(from, to, duration).easing(easing))
            }
            Self::Spring { stiffness, damping } => {
                let (rest, rest_velocity) = if channel.is_offset() {
                    (0.01, 0.1)
                } else {
                    (0.0005, 0.005)
                };
                Box::new(
                    Spring::new(from, to)
                        .with_stiffness(stiffness)
                        .with_damping(damping)
                        .with_velocity(velocity)
                        .with_rest_thresholds(rest, rest_velocity),
                )
            }
        }
    }
}

#[cfg(feature = "serde")]
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
