#![forbid(unsafe_code)]

//! The swipe panel widget.
//!
//! [`SwipePanel`] wires the [`GestureArbiter`] and the [`TransitionController`]
//! to one shared [`PanelState`], implements the host's
//! [`GestureResponder`] interface, and fires the lifecycle callbacks.
//!
//! State is shared through `Rc<RefCell<_>>` so that [`SwipeHandle`]s given to
//! content can reach it. Callbacks always run after the borrow is released,
//! which lets a callback call back into the panel or a handle.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use swipeup_core::geometry::Viewport;
//! use swipeup_panel::{PanelConfig, PanelEvent, SwipePanel};
//!
//! let panel = SwipePanel::new(PanelConfig::default(), Viewport::new(400.0, 800.0));
//! panel.open();
//! while panel.is_animating() {
//!     panel.tick(Duration::from_millis(16));
//! }
//! assert!(panel.is_open());
//! assert_eq!(panel.take_events(), vec![PanelEvent::OpenStarted, PanelEvent::Opened]);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use swipeup_core::channel::ChannelRange;
use swipeup_core::geometry::Viewport;
use swipeup_core::pointer::{GestureResponder, GestureSession, GestureState};

use crate::arbiter::{ClaimGate, GestureArbiter};
use crate::config::PanelConfig;
use crate::handle::SwipeHandle;
use crate::state::{CommitTarget, PanelState};
use crate::transition::{PanelEvent, TransitionController};
use crate::view::PanelFrame;

type Callback = Rc<dyn Fn()>;
type StatusBarCallback = Rc<dyn Fn(bool)>;

#[derive(Clone, Default)]
struct Callbacks {
    on_open: Option<Callback>,
    on_close: Option<Callback>,
    on_status_bar: Option<StatusBarCallback>,
}

impl Callbacks {
    fn fire(&self, event: PanelEvent) {
        match event {
            PanelEvent::Opened => {
                if let Some(f) = &self.on_open {
                    f();
                }
                if let Some(f) = &self.on_status_bar {
                    f(true);
                }
            }
            PanelEvent::CloseStarted => {
                if let Some(f) = &self.on_close {
                    f();
                }
                if let Some(f) = &self.on_status_bar {
                    f(false);
                }
            }
            PanelEvent::OpenStarted | PanelEvent::Closed => {}
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    from_open: bool,
    samples: u32,
}

pub(crate) struct PanelInner {
    config: PanelConfig,
    viewport: Viewport,
    state: PanelState,
    arbiter: GestureArbiter,
    controller: TransitionController,
    drag: Option<Drag>,
    status_bar_hidden: bool,
    journal: Vec<PanelEvent>,
    callbacks: Callbacks,
}

impl PanelInner {
    fn gate(&self) -> ClaimGate {
        ClaimGate {
            animating: self.controller.is_animating(),
            can_swipe_up: self.controller.can_swipe_up(),
        }
    }

    fn abandon_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            tracing::debug!(message = "swipeup.drag.abandoned", samples = drag.samples);
        }
    }

    fn frame(&self) -> PanelFrame {
        PanelFrame::new(
            &self.state,
            self.controller.is_animating(),
            self.drag.is_some(),
            self.status_bar_hidden,
        )
    }
}

/// A draggable bottom panel.
///
/// Cloning a `SwipePanel` yields another owner of the same panel.
#[derive(Clone)]
pub struct SwipePanel {
    inner: Rc<RefCell<PanelInner>>,
}

impl fmt::Debug for SwipePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SwipePanel")
            .field("state", &inner.state)
            .field("commit", &inner.controller.target())
            .field("dragging", &inner.drag.is_some())
            .finish()
    }
}

impl SwipePanel {
    /// Create a closed panel for `viewport`.
    ///
    /// The viewport is read once; later resizes are not tracked. A config
    /// that fails [`PanelConfig::validate`] is logged and still used; its
    /// non-finite values are neutralized by the channel range and the
    /// spring's parameter limits.
    #[must_use]
    pub fn new(config: PanelConfig, viewport: Viewport) -> Self {
        let errors = config.validate();
        if !errors.is_empty() {
            tracing::warn!(
                message = "swipeup.config.invalid",
                errors = %errors.join("; "),
            );
        }
        let range = ChannelRange::new(
            viewport.open_travel(config.collapsed_height),
            config.inner_bar_travel,
            config.content_opacity_floor,
        );
        let inner = PanelInner {
            arbiter: GestureArbiter::new(&config, viewport),
            controller: TransitionController::new(&config),
            state: PanelState::new(range),
            config,
            viewport,
            drag: None,
            status_bar_hidden: false,
            journal: Vec::new(),
            callbacks: Callbacks::default(),
        };
        tracing::debug!(
            message = "swipeup.panel.new",
            height = viewport.height,
            max_offset = range.max_offset(),
        );
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub(crate) fn from_inner(inner: Rc<RefCell<PanelInner>>) -> Self {
        Self { inner }
    }

    /// Callback fired once per completed open commit.
    #[must_use]
    pub fn on_open_swipe_content(self, f: impl Fn() + 'static) -> Self {
        self.inner.borrow_mut().callbacks.on_open = Some(Rc::new(f));
        self
    }

    /// Callback fired once per close commit, before its animation runs.
    #[must_use]
    pub fn on_close_swipe_content(self, f: impl Fn() + 'static) -> Self {
        self.inner.borrow_mut().callbacks.on_close = Some(Rc::new(f));
        self
    }

    /// Status-bar hook: `true` once an open completes, `false` when a close
    /// starts.
    #[must_use]
    pub fn on_status_bar(self, f: impl Fn(bool) + 'static) -> Self {
        self.inner.borrow_mut().callbacks.on_status_bar = Some(Rc::new(f));
        self
    }

    /// Capability object for content.
    pub fn handle(&self) -> SwipeHandle {
        SwipeHandle::new(&self.inner)
    }

    /// A gesture session using this panel's velocity window.
    pub fn gesture_session(&self) -> GestureSession {
        GestureSession::new(self.inner.borrow().config.velocity_window)
    }

    /// Configuration the panel was built with.
    pub fn config(&self) -> PanelConfig {
        self.inner.borrow().config.clone()
    }

    /// Viewport the panel was built for.
    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    /// Snapshot of the panel state.
    pub fn state(&self) -> PanelState {
        self.inner.borrow().state.clone()
    }

    /// Snapshot for rendering.
    pub fn frame(&self) -> PanelFrame {
        self.inner.borrow().frame()
    }

    /// Last committed state.
    pub fn is_open(&self) -> bool {
        self.inner.borrow().state.is_open()
    }

    /// Whether an open has ever completed.
    pub fn has_opened(&self) -> bool {
        self.inner.borrow().state.has_opened()
    }

    /// Whether a commit animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.inner.borrow().controller.is_animating()
    }

    /// Whether the panel owns a drag.
    pub fn is_dragging(&self) -> bool {
        self.inner.borrow().drag.is_some()
    }

    /// Whether the open path is enabled.
    pub fn can_swipe_up(&self) -> bool {
        self.inner.borrow().controller.can_swipe_up()
    }

    /// Enable or disable the open path.
    pub fn set_can_swipe_up(&self, enabled: bool) {
        self.inner.borrow_mut().controller.set_can_swipe_up(enabled);
    }

    /// Lock the drag-to-close gesture.
    pub fn disable_swipe(&self) {
        self.set_lock(true);
    }

    /// Unlock the drag-to-close gesture.
    pub fn enable_swipe(&self) {
        self.set_lock(false);
    }

    fn set_lock(&self, locked: bool) {
        self.inner.borrow_mut().state.set_override_swipe(locked);
        tracing::debug!(message = "swipeup.lock", locked);
    }

    /// Animate to the open state.
    ///
    /// A drag in progress is abandoned once the commit starts; its release
    /// is then ignored.
    pub fn open(&self) -> Vec<PanelEvent> {
        self.run(|inner| {
            let events = inner.controller.open(&mut inner.state);
            if !events.is_empty() {
                inner.abandon_drag();
            }
            events
        })
    }

    /// Animate to the closed state.
    pub fn close(&self) -> Vec<PanelEvent> {
        self.run(|inner| {
            inner.abandon_drag();
            inner.controller.close(&mut inner.state)
        })
    }

    /// Advance the commit animation by `dt`.
    pub fn tick(&self, dt: Duration) -> Vec<PanelEvent> {
        self.run(|inner| inner.controller.tick(&mut inner.state, dt))
    }

    /// Drain every event produced since the last call.
    pub fn take_events(&self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.inner.borrow_mut().journal)
    }

    /// Apply `f`, record its events, then fire callbacks outside the borrow.
    fn run(&self, f: impl FnOnce(&mut PanelInner) -> Vec<PanelEvent>) -> Vec<PanelEvent> {
        let (events, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let events = f(&mut *inner);
            if events.is_empty() {
                return events;
            }
            for event in &events {
                match event {
                    PanelEvent::Opened => inner.status_bar_hidden = true,
                    PanelEvent::CloseStarted => inner.status_bar_hidden = false,
                    PanelEvent::OpenStarted | PanelEvent::Closed => {}
                }
            }
            inner.journal.extend_from_slice(&events);
            (events, inner.callbacks.clone())
        };
        for &event in &events {
            callbacks.fire(event);
        }
        events
    }

    fn claim(&self, gesture: &GestureState, phase: &'static str) -> bool {
        let inner = self.inner.borrow();
        let decision = inner
            .arbiter
            .should_claim(&inner.state, inner.gate(), gesture.dx, gesture.dy);
        tracing::debug!(
            message = "swipeup.claim",
            phase,
            dx = gesture.dx,
            dy = gesture.dy,
            decision = decision.label(),
        );
        decision.is_claim()
    }

    fn finish_drag(&self, resolve: impl FnOnce(&PanelInner) -> (CommitTarget, f64)) {
        self.run(|inner| {
            let Some(drag) = inner.drag.take() else {
                return Vec::new();
            };
            let (target, velocity) = resolve(inner);
            tracing::debug!(
                message = "swipeup.drag.end",
                from_open = drag.from_open,
                samples = drag.samples,
                to = target.label(),
            );
            inner.controller.settle(&mut inner.state, target, velocity)
        });
    }
}

impl GestureResponder for SwipePanel {
    fn should_claim_on_move(&mut self, gesture: &GestureState) -> bool {
        self.claim(gesture, "bubble")
    }

    fn should_claim_on_move_capture(&mut self, gesture: &GestureState) -> bool {
        self.claim(gesture, "capture")
    }

    fn on_grant(&mut self, gesture: &GestureState) {
        let mut inner = self.inner.borrow_mut();
        let from_open = inner.state.is_open();
        inner.drag = Some(Drag {
            from_open,
            samples: 0,
        });
        tracing::debug!(message = "swipeup.drag.grant", from_open, dy = gesture.dy);
    }

    fn on_move(&mut self, gesture: &GestureState) {
        let mut inner = self.inner.borrow_mut();
        let inner = &mut *inner;
        let Some(drag) = inner.drag.as_mut() else {
            return;
        };
        drag.samples += 1;
        match inner.arbiter.apply_drag_sample(&inner.state, gesture.dy) {
            Some(values) => {
                inner.state.set_values(values);
                tracing::trace!(
                    message = "swipeup.drag.sample",
                    dy = gesture.dy,
                    position_y = values.panel_offset,
                );
            }
            None => tracing::trace!(message = "swipeup.drag.ignored", dy = gesture.dy),
        }
    }

    fn on_release(&mut self, gesture: &GestureState) {
        let gesture = *gesture;
        self.finish_drag(|inner| {
            let decision =
                inner
                    .arbiter
                    .release_decision(inner.state.is_open(), gesture.dy, gesture.vy);
            tracing::debug!(
                message = "swipeup.release",
                dy = gesture.dy,
                vy = gesture.vy,
                weighted = decision.weighted,
                threshold = decision.threshold,
                to = decision.target.label(),
            );
            // Pointer velocity is px/ms; drivers take px/s.
            (decision.target, gesture.vy * 1000.0)
        });
    }

    fn on_terminate(&mut self, _gesture: &GestureState) {
        self.finish_drag(|inner| {
            let target = inner.arbiter.termination_target(&inner.state);
            tracing::debug!(message = "swipeup.terminate", to = target.label());
            (target, 0.0)
        });
    }

    fn on_termination_request(&mut self, _gesture: &GestureState) -> bool {
        true
    }

    fn should_block_native_responder(&self) -> bool {
        self.inner.borrow().config.block_native_responder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use swipeup_core::pointer::{PointerEvent, PointerSample};
    use tracing_test::traced_test;

    const MS_16: Duration = Duration::from_millis(16);

    fn panel() -> SwipePanel {
        SwipePanel::new(PanelConfig::default(), Viewport::new(400.0, 800.0))
    }

    fn settle(panel: &SwipePanel) {
        for _ in 0..1000 {
            if !panel.is_animating() {
                return;
            }
            panel.tick(MS_16);
        }
        panic!("panel never settled");
    }

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    /// Drag from y=700 by `dy` over `steps` frames, then release.
    fn drag(panel: &mut SwipePanel, dy: f64, steps: u64) {
        let mut session = panel.gesture_session();
        session.handle(PointerEvent::Down(PointerSample::new(200.0, 700.0, at(0))), panel);
        for i in 1..=steps {
            let y = 700.0 + dy * i as f64 / steps as f64;
            session.handle(PointerEvent::Move(PointerSample::new(200.0, y, at(i * 16))), panel);
        }
        session.handle(
            PointerEvent::Up(PointerSample::new(200.0, 700.0 + dy, at(steps * 16 + 200))),
            panel,
        );
    }

    #[test]
    fn new_panel_is_closed_at_rest() {
        let p = panel();
        let s = p.state();
        assert!(!p.is_open());
        assert!(s.is_at_rest());
        assert_eq!(s.max_offset(), -736.0);
    }

    #[test]
    fn long_upward_drag_opens() {
        let mut p = panel();
        drag(&mut p, -300.0, 10);
        assert!(!p.is_open(), "commit must wait for the animation");
        assert!(p.is_animating());
        settle(&p);
        assert!(p.is_open());
        assert_eq!(p.state().values(), p.state().range().open());
    }

    #[test]
    fn short_upward_drag_snaps_back() {
        let mut p = panel();
        drag(&mut p, -40.0, 4);
        settle(&p);
        assert!(!p.is_open());
        assert!(p.state().is_at_rest());
    }

    #[test]
    fn callbacks_fire_outside_borrow() {
        let p = panel();
        let handle = p.handle();
        let opened = Rc::new(Cell::new(0));
        let seen = opened.clone();
        let p = p.on_open_swipe_content(move || {
            seen.set(seen.get() + 1);
            // Re-entrant call into the panel from inside a callback.
            handle.enable_swipe();
        });
        p.open();
        settle(&p);
        assert_eq!(opened.get(), 1);
        assert!(!p.state().override_swipe());
    }

    #[test]
    fn close_callback_fires_before_animation() {
        let closing = Rc::new(Cell::new(0));
        let seen = closing.clone();
        let p = panel().on_close_swipe_content(move || seen.set(seen.get() + 1));
        p.open();
        settle(&p);
        assert_eq!(p.close(), vec![PanelEvent::CloseStarted]);
        assert_eq!(closing.get(), 1);
        // No frame has run yet: the sheet is still fully open.
        assert_eq!(p.state().position_y(), -736.0);
        assert!(p.is_open());
        settle(&p);
        assert!(!p.is_open());
        assert_eq!(closing.get(), 1);
    }

    #[test]
    fn status_bar_hook_follows_commits() {
        let hidden = Rc::new(Cell::new(false));
        let seen = hidden.clone();
        let p = panel().on_status_bar(move |h| seen.set(h));
        p.open();
        assert!(!hidden.get());
        settle(&p);
        assert!(hidden.get());
        assert!(p.frame().status_bar_hidden);
        p.close();
        assert!(!hidden.get());
    }

    #[test]
    fn lock_blocks_drag_to_close_until_enabled() {
        let mut p = panel();
        p.open();
        settle(&p);
        assert!(p.state().override_swipe());
        drag(&mut p, 400.0, 10);
        assert!(!p.is_animating());
        assert!(p.is_open());
        p.enable_swipe();
        drag(&mut p, 400.0, 10);
        settle(&p);
        assert!(!p.is_open());
    }

    #[test]
    fn preemption_while_open_returns_to_open_rest() {
        let mut p = panel();
        p.open();
        settle(&p);
        p.enable_swipe();
        let mut session = p.gesture_session();
        session.handle(PointerEvent::Down(PointerSample::new(0.0, 100.0, at(0))), &mut p);
        session.handle(PointerEvent::Move(PointerSample::new(0.0, 300.0, at(16))), &mut p);
        assert!(p.is_dragging());
        assert!(p.state().position_y() > -736.0);
        session.handle(PointerEvent::Preempt, &mut p);
        assert!(!p.is_dragging());
        settle(&p);
        assert!(p.is_open());
        assert_eq!(p.state().values(), p.state().range().open());
    }

    #[test]
    fn claims_rejected_while_animating() {
        let mut p = panel();
        p.open();
        let mut session = p.gesture_session();
        session.handle(PointerEvent::Down(PointerSample::new(0.0, 700.0, at(0))), &mut p);
        session.handle(PointerEvent::Move(PointerSample::new(0.0, 600.0, at(16))), &mut p);
        assert!(!session.is_claimed());
    }

    #[test]
    fn programmatic_commit_abandons_drag() {
        let mut p = panel();
        let mut session = p.gesture_session();
        session.handle(PointerEvent::Down(PointerSample::new(0.0, 700.0, at(0))), &mut p);
        session.handle(PointerEvent::Move(PointerSample::new(0.0, 650.0, at(16))), &mut p);
        assert!(p.is_dragging());
        p.open();
        assert!(!p.is_dragging());
        session.handle(PointerEvent::Move(PointerSample::new(0.0, 600.0, at(32))), &mut p);
        session.handle(PointerEvent::Up(PointerSample::new(0.0, 600.0, at(48))), &mut p);
        settle(&p);
        assert!(p.is_open());
        assert_eq!(p.take_events(), vec![PanelEvent::OpenStarted, PanelEvent::Opened]);
    }

    #[test]
    fn blocks_native_responder_per_config() {
        let p = panel();
        assert!(p.should_block_native_responder());
        let q = SwipePanel::new(
            PanelConfig::default().block_native_responder(false),
            Viewport::new(400.0, 800.0),
        );
        assert!(!q.should_block_native_responder());
    }

    #[test]
    fn events_are_journaled_in_order() {
        let p = panel();
        p.open();
        settle(&p);
        p.close();
        settle(&p);
        assert_eq!(
            p.take_events(),
            vec![
                PanelEvent::OpenStarted,
                PanelEvent::Opened,
                PanelEvent::CloseStarted,
                PanelEvent::Closed,
            ]
        );
        assert!(p.take_events().is_empty());
    }

    #[test]
    #[traced_test]
    fn release_decision_is_logged() {
        let mut p = panel();
        drag(&mut p, -300.0, 5);
        assert!(logs_contain("swipeup.claim"));
        assert!(logs_contain("swipeup.release"));
        assert!(logs_contain("swipeup.commit.start"));
    }

    #[test]
    #[traced_test]
    fn nan_opacity_floor_is_logged_and_drags_stay_in_range() {
        let config = PanelConfig::default().content_opacity_floor(f64::NAN);
        let mut p = SwipePanel::new(config, Viewport::new(400.0, 800.0));
        assert!(logs_contain("swipeup.config.invalid"));

        let mut session = p.gesture_session();
        session.handle(PointerEvent::Down(PointerSample::new(200.0, 700.0, at(0))), &mut p);
        session.handle(PointerEvent::Move(PointerSample::new(200.0, 650.0, at(16))), &mut p);
        assert!(p.is_dragging());
        let state = p.state();
        assert!(state.range().contains(&state.values()));
        assert_eq!(state.values().panel_offset, -50.0);
        session.handle(PointerEvent::Up(PointerSample::new(200.0, 650.0, at(400))), &mut p);
        settle(&p);
        assert_eq!(p.state().values(), p.state().range().closed());
    }
}
