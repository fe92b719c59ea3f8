#![forbid(unsafe_code)]

//! Rendering surface: frame snapshots and content slots.
//!
//! The panel does not paint anything. A renderer reads a [`PanelFrame`] each
//! frame; content is supplied through [`PanelContent`] and assembled by
//! [`PanelView`], which routes the expanded slot through a [`Frozen`] gate
//! keyed on the committed state so drag frames reuse it.

use std::fmt;

#[cfg(feature = "config")]
use serde::Serialize;
use swipeup_core::channel::ChannelValues;

use crate::freeze::Frozen;
use crate::handle::SwipeHandle;
use crate::panel::SwipePanel;
use crate::state::PanelState;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize))]
pub struct PanelFrame {
    /// Channel values; opacities clamped to `[0, 1]`.
    pub values: ChannelValues,
    /// Last committed state.
    pub is_open: bool,
    /// An open has completed at least once.
    pub has_opened: bool,
    /// A commit animation is in flight.
    pub is_animating: bool,
    /// The panel owns a drag.
    pub is_dragging: bool,
    /// Drag-to-close is locked.
    pub override_swipe: bool,
    /// The status bar should be hidden.
    pub status_bar_hidden: bool,
}

impl PanelFrame {
    pub(crate) fn new(
        state: &PanelState,
        is_animating: bool,
        is_dragging: bool,
        status_bar_hidden: bool,
    ) -> Self {
        let mut values = state.values();
        // Overshooting easings can push opacities past their range.
        values.wrapper_opacity = values.wrapper_opacity.clamp(0.0, 1.0);
        values.content_opacity = values.content_opacity.clamp(0.0, 1.0);
        Self {
            values,
            is_open: state.is_open(),
            has_opened: state.has_opened(),
            is_animating,
            is_dragging,
            override_swipe: state.override_swipe(),
            status_bar_hidden,
        }
    }

    /// Sheet offset.
    #[inline]
    pub fn position_y(&self) -> f64 {
        self.values.panel_offset
    }
}

/// Content shown by a panel.
///
/// Every slot receives a [`SwipeHandle`]. The expanded slot is frozen: it is
/// rebuilt only when the committed state changes, so it must not depend on
/// live channel values.
pub trait PanelContent {
    /// Rendered output of one slot.
    type Output;

    /// Content of the collapsed bar.
    fn collapsed(&self, handle: &SwipeHandle, frame: &PanelFrame) -> Self::Output;

    /// Content of the expanded sheet for the given committed state.
    fn expanded(&self, handle: &SwipeHandle, is_open: bool) -> Self::Output;

    /// Optional player block shown over both states.
    fn player(&self, handle: &SwipeHandle, frame: &PanelFrame) -> Option<Self::Output> {
        let _ = (handle, frame);
        None
    }
}

/// One assembled frame of content.
#[derive(Debug)]
pub struct RenderedPanel<'a, O> {
    /// Frame the content was built for.
    pub frame: PanelFrame,
    /// Collapsed slot.
    pub collapsed: O,
    /// Expanded slot, possibly reused from an earlier frame.
    pub expanded: &'a O,
    /// Player slot.
    pub player: Option<O>,
}

/// Assembles [`PanelContent`] for a [`SwipePanel`].
pub struct PanelView<C: PanelContent> {
    content: C,
    expanded: Frozen<bool, C::Output>,
}

impl<C: PanelContent> fmt::Debug for PanelView<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelView")
            .field("expanded_renders", &self.expanded.misses())
            .finish_non_exhaustive()
    }
}

impl<C: PanelContent> PanelView<C> {
    /// Wrap content.
    pub fn new(content: C) -> Self {
        Self {
            content,
            expanded: Frozen::new(),
        }
    }

    /// Render every slot for the panel's current frame.
    pub fn render(&mut self, panel: &SwipePanel) -> RenderedPanel<'_, C::Output> {
        let frame = panel.frame();
        let handle = panel.handle();
        let content = &self.content;
        let collapsed = content.collapsed(&handle, &frame);
        let player = content.player(&handle, &frame);
        let expanded = self
            .expanded
            .get_or_render(&frame.is_open, || content.expanded(&handle, frame.is_open));
        RenderedPanel {
            frame,
            collapsed,
            expanded,
            player,
        }
    }

    /// Rebuild the expanded slot on the next render.
    pub fn invalidate_expanded(&mut self) {
        self.expanded.invalidate();
    }

    /// How many times the expanded slot has been built.
    pub fn expanded_renders(&self) -> u64 {
        self.expanded.misses()
    }

    /// Wrapped content.
    pub fn content(&self) -> &C {
        &self.content
    }
}
