#![forbid(unsafe_code)]

//! Commit transitions: `open()`, `close()`, and their completion.
//!
//! The controller turns a [`CommitTarget`] into a [`ChannelBatch`] toward the
//! target's resting values and advances it on [`TransitionController::tick`].
//! The committed flag flips only on the tick where the whole batch settles.
//!
//! # State Machine
//!
//! ```text
//! Idle --open()--> Opening --settled--> Idle (is_open = true)   [Opened]
//! Idle --close()-> Closing --settled--> Idle (is_open = false)  [Closed]
//!         [CloseStarted fires before the first frame]
//! Opening/Closing --open()/close()--> replaced, starting from live values
//! ```
//!
//! # Invariants
//!
//! 1. `is_open` never changes outside a settled tick.
//! 2. After a settled tick the live values equal the target's resting values.
//! 3. A new commit supersedes an in-flight one; targets are absolute.
//! 4. `open()` is a no-op while the open path is disabled.

use std::time::Duration;

use swipeup_core::animation::{BatchStatus, ChannelBatch, CommitMotion};
use swipeup_core::channel::{ChannelRange, ChannelValues};

use crate::config::PanelConfig;
use crate::state::{CommitTarget, PanelState};

/// Lifecycle notifications produced by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelEvent {
    /// A close commit started; fired before the animation runs.
    CloseStarted,
    /// An open commit started.
    OpenStarted,
    /// An open commit completed.
    Opened,
    /// A close commit completed.
    Closed,
}

impl PanelEvent {
    /// Short label for logs and traces.
    pub const fn label(self) -> &'static str {
        match self {
            Self::CloseStarted => "close_started",
            Self::OpenStarted => "open_started",
            Self::Opened => "opened",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug)]
struct Commit {
    target: CommitTarget,
    batch: ChannelBatch,
}

/// Owns the commit animation of a panel.
#[derive(Debug)]
pub struct TransitionController {
    motion: CommitMotion,
    can_swipe_up: bool,
    lock_after_open: bool,
    active: Option<Commit>,
}

impl TransitionController {
    /// Create an idle controller.
    #[must_use]
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            motion: config.motion,
            can_swipe_up: config.can_swipe_up,
            lock_after_open: config.lock_after_open,
            active: None,
        }
    }

    /// Build the batch that moves `from` to the resting values of `target`.
    ///
    /// `velocity` seeds the sheet offset in px/s (spring motion only).
    #[must_use]
    pub fn commit(
        &self,
        range: &ChannelRange,
        from: ChannelValues,
        target: CommitTarget,
        velocity: f64,
    ) -> ChannelBatch {
        ChannelBatch::toward(from, range.resting(target.is_open()), &self.motion, velocity)
    }

    /// Whether a commit animation is in flight.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Target of the in-flight commit.
    #[inline]
    pub fn target(&self) -> Option<CommitTarget> {
        self.active.as_ref().map(|c| c.target)
    }

    /// Whether the open path is enabled.
    #[inline]
    pub fn can_swipe_up(&self) -> bool {
        self.can_swipe_up
    }

    /// Enable or disable the open path. An in-flight open keeps running.
    pub fn set_can_swipe_up(&mut self, enabled: bool) {
        self.can_swipe_up = enabled;
    }

    /// Commit motion in use.
    #[inline]
    pub fn motion(&self) -> &CommitMotion {
        &self.motion
    }

    /// Start an open commit.
    pub fn open(&mut self, state: &mut PanelState) -> Vec<PanelEvent> {
        self.open_with_velocity(state, 0.0)
    }

    /// Start an open commit whose sheet offset starts at `velocity` px/s.
    pub fn open_with_velocity(&mut self, state: &mut PanelState, velocity: f64) -> Vec<PanelEvent> {
        if !self.can_swipe_up {
            tracing::debug!(message = "swipeup.open.ignored", reason = "swipe_up_disabled");
            return Vec::new();
        }
        if self.lock_after_open {
            state.set_override_swipe(true);
        }
        self.start(state, CommitTarget::Open, velocity);
        vec![PanelEvent::OpenStarted]
    }

    /// Start a close commit.
    pub fn close(&mut self, state: &mut PanelState) -> Vec<PanelEvent> {
        self.close_with_velocity(state, 0.0)
    }

    /// Start a close commit whose sheet offset starts at `velocity` px/s.
    pub fn close_with_velocity(&mut self, state: &mut PanelState, velocity: f64) -> Vec<PanelEvent> {
        self.start(state, CommitTarget::Closed, velocity);
        vec![PanelEvent::CloseStarted]
    }

    /// Settle a released or pre-empted drag on `target`.
    ///
    /// Falls back to closed when `target` is open but the open path is
    /// disabled, so a drag never strands the channels mid-way.
    pub fn settle(
        &mut self,
        state: &mut PanelState,
        target: CommitTarget,
        velocity: f64,
    ) -> Vec<PanelEvent> {
        match target {
            CommitTarget::Open if self.can_swipe_up => self.open_with_velocity(state, velocity),
            CommitTarget::Open => {
                tracing::debug!(message = "swipeup.settle.fallback", from = "open", to = "closed");
                self.close_with_velocity(state, velocity)
            }
            CommitTarget::Closed => self.close_with_velocity(state, velocity),
        }
    }

    /// Advance the in-flight commit and apply its values to `state`.
    pub fn tick(&mut self, state: &mut PanelState, dt: Duration) -> Vec<PanelEvent> {
        let Some(commit) = self.active.as_mut() else {
            return Vec::new();
        };
        let status = commit.batch.tick(dt);
        state.set_values(commit.batch.values());
        if status != BatchStatus::Settled {
            return Vec::new();
        }

        let target = commit.target;
        state.set_values(commit.batch.target());
        state.commit(target);
        self.active = None;
        tracing::info!(message = "swipeup.commit.complete", to = target.label());
        match target {
            CommitTarget::Open => vec![PanelEvent::Opened],
            CommitTarget::Closed => vec![PanelEvent::Closed],
        }
    }

    /// Drop the in-flight commit without completing it.
    pub fn cancel(&mut self) {
        if let Some(commit) = self.active.take() {
            tracing::debug!(message = "swipeup.commit.cancel", to = commit.target.label());
        }
    }

    fn start(&mut self, state: &PanelState, target: CommitTarget, velocity: f64) {
        let _span = tracing::debug_span!("swipeup.commit", to = target.label()).entered();
        let superseded = self.active.as_ref().map(|c| c.target.label());
        let batch = self.commit(state.range(), state.values(), target, velocity);
        tracing::info!(
            message = "swipeup.commit.start",
            to = target.label(),
            from_offset = state.position_y(),
            velocity,
            superseded = superseded.unwrap_or("none"),
        );
        self.active = Some(Commit { target, batch });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const MS_16: Duration = Duration::from_millis(16);

    fn range() -> ChannelRange {
        ChannelRange::new(736.0, 48.0, 0.25)
    }

    fn run(controller: &mut TransitionController, state: &mut PanelState) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        for _ in 0..1000 {
            events.extend(controller.tick(state, MS_16));
            if !controller.is_animating() {
                break;
            }
        }
        events
    }

    #[test]
    fn open_commits_only_after_settling() {
        let mut c = TransitionController::new(&PanelConfig::default());
        let mut s = PanelState::new(range());
        assert_eq!(c.open(&mut s), vec![PanelEvent::OpenStarted]);
        assert!(s.override_swipe());
        assert!(c.is_animating());
        assert_eq!(c.target(), Some(CommitTarget::Open));

        let mut opened = Vec::new();
        for frame in 0..20 {
            let events = c.tick(&mut s, MS_16);
            if events.is_empty() {
                assert!(!s.is_open(), "flipped early on frame {frame}");
            } else {
                opened = events;
                break;
            }
        }
        assert_eq!(opened, vec![PanelEvent::Opened]);
        assert!(s.is_open() && s.has_opened());
        assert_eq!(s.values(), range().open());
        assert!(!c.is_animating());
    }

    #[test]
    fn close_reports_start_before_any_frame() {
        let mut c = TransitionController::new(&PanelConfig::default());
        let mut s = PanelState::new(range());
        c.open(&mut s);
        run(&mut c, &mut s);
        let before = s.values();
        assert_eq!(c.close(&mut s), vec![PanelEvent::CloseStarted]);
        assert_eq!(s.values(), before);
        assert!(s.is_open());
        assert_eq!(run(&mut c, &mut s), vec![PanelEvent::Closed]);
        assert!(!s.is_open());
        assert_eq!(s.values(), range().closed());
    }

    #[test]
    fn open_is_noop_when_swipe_up_disabled() {
        let mut c = TransitionController::new(&PanelConfig::default().can_swipe_up(false));
        let mut s = PanelState::new(range());
        assert!(c.open(&mut s).is_empty());
        assert!(!c.is_animating());
        assert!(!s.override_swipe());
    }

    #[test]
    fn disabling_mid_open_does_not_abort() {
        let mut c = TransitionController::new(&PanelConfig::default());
        let mut s = PanelState::new(range());
        c.open(&mut s);
        c.tick(&mut s, MS_16);
        c.set_can_swipe_up(false);
        assert_eq!(run(&mut c, &mut s), vec![PanelEvent::Opened]);
        assert!(s.is_open());
    }

    #[test]
    fn repeated_open_stays_at_open_rest() {
        let mut c = TransitionController::new(&PanelConfig::default());
        let mut s = PanelState::new(range());
        for _ in 0..3 {
            c.open(&mut s);
            run(&mut c, &mut s);
            assert!(s.is_open());
            assert_eq!(s.values(), range().open());
        }
    }

    #[test]
    fn later_commit_wins() {
        let mut c = TransitionController::new(&PanelConfig::default());
        let mut s = PanelState::new(range());
        c.open(&mut s);
        c.tick(&mut s, Duration::from_millis(80));
        c.close(&mut s);
        assert_eq!(c.target(), Some(CommitTarget::Closed));
        assert_eq!(run(&mut c, &mut s), vec![PanelEvent::Closed]);
        assert!(!s.is_open());
        assert!(!s.has_opened());
        assert_eq!(s.values(), range().closed());
    }

    #[test]
    fn settle_open_falls_back_to_closed_when_disabled() {
        let mut c = TransitionController::new(&PanelConfig::default().can_swipe_up(false));
        let mut s = PanelState::new(range());
        assert_eq!(
            c.settle(&mut s, CommitTarget::Open, 0.0),
            vec![PanelEvent::CloseStarted]
        );
        assert_eq!(c.target(), Some(CommitTarget::Closed));
    }

    #[test]
    fn lock_after_open_can_be_turned_off() {
        let mut c = TransitionController::new(&PanelConfig::default().lock_after_open(false));
        let mut s = PanelState::new(range());
        c.open(&mut s);
        assert!(!s.override_swipe());
    }

    #[test]
    fn spring_commit_lands_on_rest() {
        let config = PanelConfig::default().motion(CommitMotion::spring());
        let mut c = TransitionController::new(&config);
        let mut s = PanelState::new(range());
        c.open_with_velocity(&mut s, -2000.0);
        assert_eq!(run(&mut c, &mut s), vec![PanelEvent::Opened]);
        assert_eq!(s.values(), range().open());
    }

    #[test]
    fn cancel_leaves_committed_state() {
        let mut c = TransitionController::new(&PanelConfig::default());
        let mut s = PanelState::new(range());
        c.open(&mut s);
        c.tick(&mut s, MS_16);
        c.cancel();
        assert!(!c.is_animating());
        assert!(!s.is_open());
        assert!(c.tick(&mut s, MS_16).is_empty());
    }

    #[test]
    #[traced_test]
    fn commits_are_logged() {
        let mut c = TransitionController::new(&PanelConfig::default());
        let mut s = PanelState::new(range());
        c.open(&mut s);
        run(&mut c, &mut s);
        assert!(logs_contain("swipeup.commit.start"));
        assert!(logs_contain("swipeup.commit.complete"));
    }
}
