#![forbid(unsafe_code)]

//! Pointer tracking and the gesture-responder seam.
//!
//! Host platforms deliver raw pointer samples; responders want accumulated
//! deltas and a release velocity. [`PointerTracker`] does that bookkeeping,
//! [`GestureResponder`] is the interface a claimable widget implements, and
//! [`GestureSession`] is a single-responder dispatcher that plays the host's
//! role in tests and replays.
//!
//! # Session state machine
//!
//! ```text
//! Idle --Down--> Pending --Move(claimed)--> Claimed --Up--> Idle (release)
//!                   |                          |
//!                   +--Up--> Idle              +--Preempt(granted)/Cancel--> Idle (terminate)
//! ```
//!
//! # Invariants
//!
//! 1. `GestureState::dx/dy` are accumulated from the `Down` sample.
//! 2. Velocities are in pixels per millisecond, measured over the trailing
//!    window, and zero when the window spans no time.
//! 3. A responder receives `on_move`/`on_release`/`on_terminate` only after
//!    it claimed the gesture, and exactly one of release/terminate per claim.
//!
//! # Failure Modes
//!
//! - Out-of-order timestamps are clamped to the previous sample's time.
//! - `Move`/`Up` without a preceding `Down` start a gesture at that sample.
//! - A `Down` while a gesture is still claimed terminates that gesture.

use std::collections::VecDeque;
use std::time::Duration;

/// Default trailing window for release velocity.
pub const DEFAULT_VELOCITY_WINDOW: Duration = Duration::from_millis(100);

/// One timestamped pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels (down is positive).
    pub y: f64,
    /// Time since an arbitrary, fixed origin.
    pub at: Duration,
}

impl PointerSample {
    /// Create a sample.
    #[inline]
    pub const fn new(x: f64, y: f64, at: Duration) -> Self {
        Self { x, y, at }
    }
}

/// Accumulated gesture measurements, as reported to responders.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    /// Horizontal distance since the gesture started.
    pub dx: f64,
    /// Vertical distance since the gesture started (negative is up).
    pub dy: f64,
    /// Horizontal velocity in px/ms.
    pub vx: f64,
    /// Vertical velocity in px/ms.
    pub vy: f64,
}

impl GestureState {
    /// Create a state from deltas and velocities.
    #[inline]
    pub const fn new(dx: f64, dy: f64, vx: f64, vy: f64) -> Self {
        Self { dx, dy, vx, vy }
    }
}

/// Turns raw samples into [`GestureState`]s.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    window: Duration,
    origin: Option<PointerSample>,
    recent: VecDeque<PointerSample>,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_VELOCITY_WINDOW)
    }
}

impl PointerTracker {
    /// Create a tracker measuring velocity over `window`.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            origin: None,
            recent: VecDeque::with_capacity(16),
        }
    }

    /// Start a gesture at `sample`, discarding any previous one.
    pub fn begin(&mut self, sample: PointerSample) {
        self.origin = Some(sample);
        self.recent.clear();
        self.recent.push_back(sample);
    }

    /// Record a sample and return the updated state.
    pub fn push(&mut self, mut sample: PointerSample) -> GestureState {
        let Some(last) = self.recent.back().copied() else {
            self.begin(sample);
            return self.state();
        };
        sample.at = sample.at.max(last.at);
        self.recent.push_back(sample);
        while let Some(front) = self.recent.front() {
            if self.recent.len() > 2 && sample.at.saturating_sub(front.at) > self.window {
                self.recent.pop_front();
            } else {
                break;
            }
        }
        self.state()
    }

    /// Current accumulated state (all zeros when idle).
    pub fn state(&self) -> GestureState {
        let (Some(origin), Some(first), Some(last)) =
            (self.origin, self.recent.front(), self.recent.back())
        else {
            return GestureState::default();
        };
        let span_ms = last.at.saturating_sub(first.at).as_secs_f64() * 1000.0;
        let (vx, vy) = if span_ms > 0.0 {
            ((last.x - first.x) / span_ms, (last.y - first.y) / span_ms)
        } else {
            (0.0, 0.0)
        };
        GestureState {
            dx: last.x - origin.x,
            dy: last.y - origin.y,
            vx,
            vy,
        }
    }

    /// Whether a gesture is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Forget the current gesture.
    pub fn end(&mut self) {
        self.origin = None;
        self.recent.clear();
    }
}

/// A widget that can claim pointer gestures.
///
/// Mirrors the arbitration primitive of touch platforms: the host asks
/// whether the widget wants a move gesture (capture phase first, then
/// bubble), grants it, streams moves, and ends with either a release or a
/// termination when another claimant takes over.
pub trait GestureResponder {
    /// Bubble-phase claim check for a move sample.
    fn should_claim_on_move(&mut self, gesture: &GestureState) -> bool;

    /// Capture-phase claim check, asked before nested content sees the move.
    fn should_claim_on_move_capture(&mut self, gesture: &GestureState) -> bool {
        let _ = gesture;
        false
    }

    /// The gesture was granted to this responder.
    fn on_grant(&mut self, gesture: &GestureState) {
        let _ = gesture;
    }

    /// A move sample of the claimed gesture.
    fn on_move(&mut self, gesture: &GestureState);

    /// The pointer was lifted; `gesture` carries the release velocity.
    fn on_release(&mut self, gesture: &GestureState);

    /// Another claimant took the gesture over.
    fn on_terminate(&mut self, gesture: &GestureState);

    /// Another claimant asks to take over. Returning `true` allows it.
    fn on_termination_request(&mut self, gesture: &GestureState) -> bool {
        let _ = gesture;
        true
    }

    /// Whether native (platform) scroll views should be blocked while claimed.
    fn should_block_native_responder(&self) -> bool {
        true
    }
}

/// Raw input for a [`GestureSession`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed.
    Down(PointerSample),
    /// Pointer moved while pressed.
    Move(PointerSample),
    /// Pointer lifted.
    Up(PointerSample),
    /// Another claimant requests the gesture.
    Preempt,
    /// The platform cancelled the gesture outright.
    Cancel,
}

/// What a session did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Nothing was delivered to the responder.
    Ignored,
    /// The responder claimed the gesture on this move.
    Claimed,
    /// A move was delivered to the claiming responder.
    Moved,
    /// The claimed gesture was released.
    Released,
    /// The claimed gesture was terminated.
    Terminated,
    /// The responder refused a termination request and keeps the gesture.
    Retained,
}

/// Single-responder gesture dispatcher.
#[derive(Debug, Clone, Default)]
pub struct GestureSession {
    tracker: PointerTracker,
    claimed: bool,
}

impl GestureSession {
    /// Create a session with the given velocity window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            tracker: PointerTracker::new(window),
            claimed: false,
        }
    }

    /// Whether the responder currently owns the gesture.
    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Latest accumulated gesture state.
    #[inline]
    pub fn gesture(&self) -> GestureState {
        self.tracker.state()
    }

    /// Deliver one raw event.
    pub fn handle<R>(&mut self, event: PointerEvent, responder: &mut R) -> SessionOutcome
    where
        R: GestureResponder + ?Sized,
    {
        match event {
            PointerEvent::Down(sample) => {
                // A fresh press ends whatever gesture was still claimed.
                let outcome = if std::mem::take(&mut self.claimed) {
                    responder.on_terminate(&self.tracker.state());
                    SessionOutcome::Terminated
                } else {
                    SessionOutcome::Ignored
                };
                self.tracker.begin(sample);
                outcome
            }
            PointerEvent::Move(sample) => {
                let gesture = self.tracker.push(sample);
                if self.claimed {
                    responder.on_move(&gesture);
                    return SessionOutcome::Moved;
                }
                if responder.should_claim_on_move_capture(&gesture)
                    || responder.should_claim_on_move(&gesture)
                {
                    self.claimed = true;
                    responder.on_grant(&gesture);
                    responder.on_move(&gesture);
                    return SessionOutcome::Claimed;
                }
                SessionOutcome::Ignored
            }
            PointerEvent::Up(sample) => {
                let gesture = self.tracker.push(sample);
                self.tracker.end();
                if std::mem::take(&mut self.claimed) {
                    responder.on_release(&gesture);
                    SessionOutcome::Released
                } else {
                    SessionOutcome::Ignored
                }
            }
            PointerEvent::Preempt => {
                if !self.claimed {
                    return SessionOutcome::Ignored;
                }
                let gesture = self.tracker.state();
                if responder.on_termination_request(&gesture) {
                    self.claimed = false;
                    self.tracker.end();
                    responder.on_terminate(&gesture);
                    SessionOutcome::Terminated
                } else {
                    SessionOutcome::Retained
                }
            }
            PointerEvent::Cancel => {
                let gesture = self.tracker.state();
                self.tracker.end();
                if std::mem::take(&mut self.claimed) {
                    responder.on_terminate(&gesture);
                    SessionOutcome::Terminated
                } else {
                    SessionOutcome::Ignored
                }
            }
        }
    }
}
