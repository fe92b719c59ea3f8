#![forbid(unsafe_code)]

//! The panel's single source of truth.

use swipeup_core::channel::{ChannelRange, ChannelValues};

/// Which committed state a commit settles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitTarget {
    /// Collapsed: only the bar is visible.
    Closed,
    /// Expanded: the sheet covers the screen.
    Open,
}

impl CommitTarget {
    /// Target for a committed `is_open` flag.
    #[inline]
    pub const fn from_open(is_open: bool) -> Self {
        if is_open { Self::Open } else { Self::Closed }
    }

    /// Whether this target is the open state.
    #[inline]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Short label for logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
        }
    }
}

/// Committed state and live channel values of a panel.
///
/// `is_open` only changes when a commit completes; during a drag or a commit
/// animation it keeps reporting the last committed state while the channel
/// values move.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    range: ChannelRange,
    values: ChannelValues,
    is_open: bool,
    has_opened: bool,
    override_swipe: bool,
}

impl PanelState {
    /// A closed panel at its closed resting values.
    #[must_use]
    pub fn new(range: ChannelRange) -> Self {
        Self {
            range,
            values: range.closed(),
            is_open: false,
            has_opened: false,
            override_swipe: false,
        }
    }

    /// Last committed state.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether an open commit has ever completed.
    #[inline]
    pub fn has_opened(&self) -> bool {
        self.has_opened
    }

    /// Whether the drag-to-close gesture is locked.
    #[inline]
    pub fn override_swipe(&self) -> bool {
        self.override_swipe
    }

    /// Lock or unlock the drag-to-close gesture. Last write wins.
    #[inline]
    pub fn set_override_swipe(&mut self, locked: bool) {
        self.override_swipe = locked;
    }

    /// Live channel values.
    #[inline]
    pub fn values(&self) -> ChannelValues {
        self.values
    }

    /// Channel ranges of this panel.
    #[inline]
    pub fn range(&self) -> &ChannelRange {
        &self.range
    }

    /// Sheet offset when fully open.
    #[inline]
    pub fn max_offset(&self) -> f64 {
        self.range.max_offset()
    }

    /// Live sheet offset.
    #[inline]
    pub fn position_y(&self) -> f64 {
        self.values.panel_offset
    }

    /// Live inner bar offset.
    #[inline]
    pub fn inner_bar_offset(&self) -> f64 {
        self.values.inner_bar_offset
    }

    /// Live collapsed-content opacity.
    #[inline]
    pub fn wrapper_opacity(&self) -> f64 {
        self.values.wrapper_opacity
    }

    /// Live expanded-content opacity.
    #[inline]
    pub fn content_opacity(&self) -> f64 {
        self.values.content_opacity
    }

    /// Whether the live values equal the resting values of the committed state.
    pub fn is_at_rest(&self) -> bool {
        self.values == self.range.resting(self.is_open)
    }

    pub(crate) fn set_values(&mut self, values: ChannelValues) {
        self.values = values;
    }

    /// Record a completed commit. Values must already be at rest.
    pub(crate) fn commit(&mut self, target: CommitTarget) {
        self.is_open = target.is_open();
        if self.is_open {
            self.has_opened = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PanelState {
        PanelState::new(ChannelRange::new(736.0, 48.0, 0.25))
    }

    #[test]
    fn starts_closed_at_rest() {
        let s = state();
        assert!(!s.is_open());
        assert!(!s.has_opened());
        assert!(!s.override_swipe());
        assert!(s.is_at_rest());
        assert_eq!(s.position_y(), 0.0);
        assert_eq!(s.wrapper_opacity(), 1.0);
        assert_eq!(s.content_opacity(), 0.25);
        assert_eq!(s.max_offset(), -736.0);
    }

    #[test]
    fn commit_open_marks_has_opened_for_good() {
        let mut s = state();
        s.set_values(s.range().open());
        s.commit(CommitTarget::Open);
        assert!(s.is_open() && s.has_opened() && s.is_at_rest());
        s.set_values(s.range().closed());
        s.commit(CommitTarget::Closed);
        assert!(!s.is_open());
        assert!(s.has_opened());
    }

    #[test]
    fn moving_values_leave_rest() {
        let mut s = state();
        let mut v = s.values();
        v.panel_offset = -10.0;
        s.set_values(v);
        assert!(!s.is_at_rest());
    }

    #[test]
    fn target_from_open_flag() {
        assert_eq!(CommitTarget::from_open(true), CommitTarget::Open);
        assert_eq!(CommitTarget::from_open(false), CommitTarget::Closed);
        assert_eq!(CommitTarget::Open.label(), "open");
    }
}
