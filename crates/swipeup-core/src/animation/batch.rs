#![forbid(unsafe_code)]

//! Parallel channel batch: N channels, one completion.
//!
//! A [`ChannelBatch`] owns one driver per animated [`Channel`] and advances
//! them together. It reports [`BatchStatus::Settled`] exactly once, on the
//! tick where the last running driver completes. Partial completion is never
//! observable as settlement.
//!
//! # Invariants
//!
//! 1. `Settled` is returned at most once per batch; later ticks return `Idle`.
//! 2. `Settled` implies every track is complete.
//! 3. Channels without a track keep their starting value.
//! 4. An empty batch settles on its first tick.

use std::time::Duration;

use super::{Animation, CommitMotion};
use crate::channel::{Channel, ChannelValues};

/// Outcome of advancing a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// At least one channel is still moving.
    Running,
    /// The last channel settled during this tick.
    Settled,
    /// The batch had already settled before this tick.
    Idle,
}

struct Track {
    channel: Channel,
    driver: Box<dyn Animation>,
}

impl std::fmt::Debug for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("channel", &self.channel)
            .field("value", &self.driver.value())
            .field("complete", &self.driver.is_complete())
            .finish()
    }
}

/// A set of channel drivers advanced in lockstep.
#[derive(Debug)]
pub struct ChannelBatch {
    tracks: Vec<Track>,
    values: ChannelValues,
    target: ChannelValues,
    settled: bool,
}

impl ChannelBatch {
    /// Create an empty batch whose untracked channels hold `start`.
    #[must_use]
    pub fn new(start: ChannelValues) -> Self {
        Self {
            tracks: Vec::with_capacity(Channel::ALL.len()),
            values: start,
            target: start,
            settled: false,
        }
    }

    /// Drive every channel from `start` to the absolute `target` with `motion`.
    ///
    /// `offset_velocity` seeds the panel offset channel (pixels per second);
    /// it only matters for spring motion.
    #[must_use]
    pub fn toward(
        start: ChannelValues,
        target: ChannelValues,
        motion: &CommitMotion,
        offset_velocity: f64,
    ) -> Self {
        Channel::ALL.iter().fold(Self::new(start), |batch, &channel| {
            let velocity = if channel == Channel::PanelOffset {
                offset_velocity
            } else {
                0.0
            };
            let driver = motion.driver(channel, start.get(channel), target.get(channel), velocity);
            batch.track_boxed(channel, target.get(channel), driver)
        })
    }

    /// Add or replace the driver for `channel` (builder pattern).
    #[must_use]
    pub fn track(self, channel: Channel, target: f64, driver: impl Animation + 'static) -> Self {
        self.track_boxed(channel, target, Box::new(driver))
    }

    fn track_boxed(mut self, channel: Channel, target: f64, driver: Box<dyn Animation>) -> Self {
        self.values.set(channel, driver.value());
        self.target.set(channel, target);
        match self.tracks.iter_mut().find(|t| t.channel == channel) {
            Some(existing) => existing.driver = driver,
            None => self.tracks.push(Track { channel, driver }),
        }
        self
    }

    /// Advance every unfinished driver by `dt`.
    pub fn tick(&mut self, dt: Duration) -> BatchStatus {
        if self.settled {
            return BatchStatus::Idle;
        }
        for track in &mut self.tracks {
            if !track.driver.is_complete() {
                track.driver.tick(dt);
            }
            self.values.set(track.channel, track.driver.value());
        }
        if self.tracks.iter().all(|t| t.driver.is_complete()) {
            self.settled = true;
            BatchStatus::Settled
        } else {
            BatchStatus::Running
        }
    }

    /// Current values of all channels.
    #[inline]
    pub fn values(&self) -> ChannelValues {
        self.values
    }

    /// Values the batch settles on.
    #[inline]
    pub fn target(&self) -> ChannelValues {
        self.target
    }

    /// Whether the batch has reported settlement.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Number of tracked channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether no channel is tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
