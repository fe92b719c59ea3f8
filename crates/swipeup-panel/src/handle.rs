#![forbid(unsafe_code)]

//! Capability object handed to panel content.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::panel::{PanelInner, SwipePanel};
use crate::transition::PanelEvent;

/// The narrow set of operations content may perform on its panel.
///
/// A handle does not keep the panel alive: once the panel is dropped every
/// operation is a no-op and [`SwipeHandle::is_swipe_up_content_open`] reports
/// `false`. This lets callbacks stored on the panel hold handles without
/// forming a reference cycle.
#[derive(Clone)]
pub struct SwipeHandle {
    inner: Weak<RefCell<PanelInner>>,
}

impl SwipeHandle {
    pub(crate) fn new(inner: &Rc<RefCell<PanelInner>>) -> Self {
        Self {
            inner: Rc::downgrade(inner),
        }
    }

    fn panel(&self) -> Option<SwipePanel> {
        self.inner.upgrade().map(SwipePanel::from_inner)
    }

    /// Lock the drag-to-close gesture (e.g. while a nested list scrolls).
    pub fn disable_swipe(&self) {
        if let Some(panel) = self.panel() {
            panel.disable_swipe();
        }
    }

    /// Unlock the drag-to-close gesture.
    pub fn enable_swipe(&self) {
        if let Some(panel) = self.panel() {
            panel.enable_swipe();
        }
    }

    /// Animate the panel open.
    pub fn open(&self) -> Vec<PanelEvent> {
        self.panel().map(|p| p.open()).unwrap_or_default()
    }

    /// Animate the panel closed.
    pub fn close(&self) -> Vec<PanelEvent> {
        self.panel().map(|p| p.close()).unwrap_or_default()
    }

    /// Last committed state of the panel.
    pub fn is_swipe_up_content_open(&self) -> bool {
        self.panel().is_some_and(|p| p.is_open())
    }

    /// Whether the panel is still alive.
    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for SwipeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use swipeup_core::geometry::Viewport;

    use super::*;
    use crate::config::PanelConfig;

    fn panel() -> SwipePanel {
        SwipePanel::new(PanelConfig::default(), Viewport::new(400.0, 800.0))
    }

    fn settle(panel: &SwipePanel) {
        while panel.is_animating() {
            panel.tick(Duration::from_millis(16));
        }
    }

    #[test]
    fn handle_drives_the_panel() {
        let p = panel();
        let h = p.handle();
        assert!(!h.is_swipe_up_content_open());
        assert_eq!(h.open(), vec![PanelEvent::OpenStarted]);
        settle(&p);
        assert!(h.is_swipe_up_content_open());
        assert_eq!(h.close(), vec![PanelEvent::CloseStarted]);
        settle(&p);
        assert!(!h.is_swipe_up_content_open());
    }

    #[test]
    fn handle_toggles_lock() {
        let p = panel();
        let h = p.handle();
        h.disable_swipe();
        assert!(p.state().override_swipe());
        h.enable_swipe();
        assert!(!p.state().override_swipe());
    }

    #[test]
    fn detached_handle_is_inert() {
        let h = panel().handle();
        assert!(!h.is_attached());
        assert!(h.open().is_empty());
        assert!(h.close().is_empty());
        h.disable_swipe();
        assert!(!h.is_swipe_up_content_open());
    }

    #[test]
    fn handle_does_not_keep_panel_alive() {
        let p = panel();
        let h = p.handle();
        let p = p.on_open_swipe_content(move || {
            let _ = h.is_swipe_up_content_open();
        });
        let weak = p.handle();
        drop(p);
        assert!(!weak.is_attached());
    }
}
