#![forbid(unsafe_code)]

//! Gesture arbitration: claim, live drag mapping, and release decisions.
//!
//! Every function here is pure. The arbiter reads [`PanelState`] and returns
//! what should happen; [`SwipePanel`](crate::SwipePanel) applies it.
//!
//! # Drag mapping
//!
//! With `r` the fraction of open travel covered by the finger:
//!
//! | Committed | Accepted `dy` | `position_y` | wrapper | content | inner bar |
//! |-----------|---------------|--------------|---------|---------|-----------|
//! | closed | `dy <= 0` | `dy` | `1 - r` | `floor + r` | `min(|dy|, travel)` |
//! | open | `dy >= 0` | `max_offset + dy` | `r` | `max(1 - r, floor)` | `travel - min(dy, travel)` |
//!
//! Samples in the other direction are ignored, and every output is clamped
//! into the panel's [`ChannelRange`](swipeup_core::channel::ChannelRange).
//!
//! # Release
//!
//! Distances are weighted by the release speed `vy = |velocity_y|` (px/ms):
//!
//! - closed: `|dy * (1 - vy)| > height / 10` opens, otherwise snap back.
//! - open: a downward release with `|dy * (1 + vy)| >= height / 7` closes,
//!   otherwise snap back open.
//!
//! # Failure Modes
//!
//! - Non-finite deltas are never claimed and never move channels.
//! - A zero open travel keeps every ratio at zero instead of dividing by it.

use swipeup_core::channel::ChannelValues;
use swipeup_core::geometry::Viewport;

use crate::config::PanelConfig;
use crate::state::{CommitTarget, PanelState};

/// Outcome of a claim check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecision {
    /// The panel takes the gesture.
    Claim,
    /// Open and locked by the expanded content.
    Locked,
    /// A commit animation owns the channels.
    Animating,
    /// Closed and the open path is disabled.
    SwipeUpDisabled,
    /// No vertical movement yet.
    NoVerticalMovement,
    /// Moving toward the state the panel is already in.
    WrongDirection,
    /// Too horizontal to be a panel drag.
    TooHorizontal,
}

impl ClaimDecision {
    /// Whether the gesture is claimed.
    #[inline]
    pub const fn is_claim(self) -> bool {
        matches!(self, Self::Claim)
    }

    /// Short label for logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::Locked => "locked",
            Self::Animating => "animating",
            Self::SwipeUpDisabled => "swipe_up_disabled",
            Self::NoVerticalMovement => "no_vertical_movement",
            Self::WrongDirection => "wrong_direction",
            Self::TooHorizontal => "too_horizontal",
        }
    }
}

/// Runtime conditions a claim depends on besides [`PanelState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimGate {
    /// A commit animation is in flight.
    pub animating: bool,
    /// The open path is enabled.
    pub can_swipe_up: bool,
}

/// A release decision with the numbers behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseDecision {
    /// State to commit to.
    pub target: CommitTarget,
    /// Velocity-weighted distance.
    pub weighted: f64,
    /// Threshold the weighted distance was compared to.
    pub threshold: f64,
}

/// Claim and release rules of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureArbiter {
    claim_ratio: f64,
    open_threshold: f64,
    close_threshold: f64,
}

impl GestureArbiter {
    /// Derive thresholds from the configuration and the screen height.
    #[must_use]
    pub fn new(config: &PanelConfig, viewport: Viewport) -> Self {
        Self {
            claim_ratio: config.claim_ratio,
            open_threshold: viewport.height / config.open_threshold_divisor,
            close_threshold: viewport.height / config.close_threshold_divisor,
        }
    }

    /// Ratio `|dx| / |dy|` at which gestures stop being claimed.
    #[inline]
    pub fn claim_ratio(&self) -> f64 {
        self.claim_ratio
    }

    /// Weighted distance a release from closed must exceed to open.
    #[inline]
    pub fn open_threshold(&self) -> f64 {
        self.open_threshold
    }

    /// Weighted distance a release from open must reach to close.
    #[inline]
    pub fn close_threshold(&self) -> f64 {
        self.close_threshold
    }

    /// Decide whether the panel claims a move with accumulated `(dx, dy)`.
    pub fn should_claim(&self, state: &PanelState, gate: ClaimGate, dx: f64, dy: f64) -> ClaimDecision {
        let open = state.is_open();
        if open && state.override_swipe() {
            return ClaimDecision::Locked;
        }
        if gate.animating {
            return ClaimDecision::Animating;
        }
        if !open && !gate.can_swipe_up {
            return ClaimDecision::SwipeUpDisabled;
        }
        if dy == 0.0 || !dy.is_finite() {
            return ClaimDecision::NoVerticalMovement;
        }
        if (open && dy < 0.0) || (!open && dy > 0.0) {
            return ClaimDecision::WrongDirection;
        }
        // NaN dx fails the comparison and is rejected with it.
        if !(dx.abs() / dy.abs() < self.claim_ratio) {
            return ClaimDecision::TooHorizontal;
        }
        ClaimDecision::Claim
    }

    /// Channel values for a drag sample, or `None` when the sample is ignored.
    pub fn apply_drag_sample(&self, state: &PanelState, dy: f64) -> Option<ChannelValues> {
        if !dy.is_finite() {
            return None;
        }
        let range = state.range();
        let max = range.max_offset();
        let travel = range.inner_bar_travel();
        let floor = range.content_floor();
        let ratio = |d: f64| {
            if max < 0.0 {
                (d.abs() / max.abs()).min(1.0)
            } else {
                0.0
            }
        };

        let values = if !state.is_open() && dy <= 0.0 {
            let r = ratio(dy);
            ChannelValues {
                panel_offset: dy,
                inner_bar_offset: dy.abs().min(travel),
                wrapper_opacity: 1.0 - r,
                content_opacity: (floor + r).min(1.0),
            }
        } else if state.is_open() && dy >= 0.0 {
            let r = ratio(dy);
            ChannelValues {
                panel_offset: max + dy,
                inner_bar_offset: travel - dy.min(travel),
                wrapper_opacity: r,
                content_opacity: (1.0 - r).max(floor),
            }
        } else {
            return None;
        };
        Some(range.clamp(values))
    }

    /// Decide the commit for a release with accumulated `dy` and vertical
    /// velocity `velocity_y` (px/ms, either sign).
    pub fn release_decision(&self, is_open: bool, dy: f64, velocity_y: f64) -> ReleaseDecision {
        let vy = velocity_y.abs();
        if is_open {
            let weighted = (dy * (1.0 + vy)).abs();
            let target = if dy >= 0.0 && weighted >= self.close_threshold {
                CommitTarget::Closed
            } else {
                CommitTarget::Open
            };
            ReleaseDecision {
                target,
                weighted,
                threshold: self.close_threshold,
            }
        } else {
            let weighted = (dy * (1.0 - vy)).abs();
            let target = if weighted > self.open_threshold {
                CommitTarget::Open
            } else {
                CommitTarget::Closed
            };
            ReleaseDecision {
                target,
                weighted,
                threshold: self.open_threshold,
            }
        }
    }

    /// Commit target when another claimant takes the gesture over: the last
    /// committed state.
    #[inline]
    pub fn termination_target(&self, state: &PanelState) -> CommitTarget {
        CommitTarget::from_open(state.is_open())
    }
}
