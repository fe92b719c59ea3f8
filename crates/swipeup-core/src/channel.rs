#![forbid(unsafe_code)]

//! Animated channels of a swipe panel.
//!
//! A panel is fully described, visually, by four numbers: the sheet's
//! vertical offset, the inner bar's offset, and two opacities. Each is a
//! [`Channel`]; a snapshot of all four is a [`ChannelValues`].
//!
//! # Invariants
//!
//! 1. `ChannelRange::closed()` and `ChannelRange::open()` are the only
//!    resting values; both satisfy `ChannelRange::contains`.
//! 2. `ChannelRange::clamp` output always satisfies `contains`.
//! 3. `max_offset <= 0` (the sheet moves up, toward negative y).

/// One independently animated property of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Vertical offset of the whole sheet; `0` closed, `max_offset` open.
    PanelOffset,
    /// Offset of the inner bar; `0` closed, `inner_bar_travel` open.
    InnerBarOffset,
    /// Opacity of the collapsed content; `1` closed, `0` open.
    WrapperOpacity,
    /// Opacity of the expanded content; `floor` closed, `1` open.
    ContentOpacity,
}

impl Channel {
    /// All channels in a stable order.
    pub const ALL: [Channel; 4] = [
        Channel::PanelOffset,
        Channel::InnerBarOffset,
        Channel::WrapperOpacity,
        Channel::ContentOpacity,
    ];

    /// Short label for logs and traces.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PanelOffset => "panel_offset",
            Self::InnerBarOffset => "inner_bar_offset",
            Self::WrapperOpacity => "wrapper_opacity",
            Self::ContentOpacity => "content_opacity",
        }
    }

    /// Whether the channel is measured in pixels (as opposed to an opacity).
    #[inline]
    pub const fn is_offset(self) -> bool {
        matches!(self, Self::PanelOffset | Self::InnerBarOffset)
    }
}

/// Snapshot of all four channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelValues {
    /// Sheet offset in pixels.
    pub panel_offset: f64,
    /// Inner bar offset in pixels.
    pub inner_bar_offset: f64,
    /// Collapsed-content opacity.
    pub wrapper_opacity: f64,
    /// Expanded-content opacity.
    pub content_opacity: f64,
}

impl ChannelValues {
    /// Read one channel.
    #[inline]
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::PanelOffset => self.panel_offset,
            Channel::InnerBarOffset => self.inner_bar_offset,
            Channel::WrapperOpacity => self.wrapper_opacity,
            Channel::ContentOpacity => self.content_opacity,
        }
    }

    /// Write one channel.
    #[inline]
    pub fn set(&mut self, channel: Channel, value: f64) {
        match channel {
            Channel::PanelOffset => self.panel_offset = value,
            Channel::InnerBarOffset => self.inner_bar_offset = value,
            Channel::WrapperOpacity => self.wrapper_opacity = value,
            Channel::ContentOpacity => self.content_opacity = value,
        }
    }
}

#[inline]
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// The value ranges of a concrete panel.
///
/// Derived once from the viewport and the panel's layout constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRange {
    max_offset: f64,
    inner_bar_travel: f64,
    content_floor: f64,
}

impl ChannelRange {
    /// Build a range from the open travel distance (positive pixels), the
    /// inner bar travel, and the expanded-content opacity floor.
    ///
    /// Negative travels are treated as zero and the floor is clamped to
    /// `[0, 1]`. Non-finite inputs become zero, so every bound stays
    /// comparable.
    pub fn new(open_travel: f64, inner_bar_travel: f64, content_floor: f64) -> Self {
        Self {
            max_offset: -finite_or_zero(open_travel).abs(),
            inner_bar_travel: finite_or_zero(inner_bar_travel).max(0.0),
            content_floor: finite_or_zero(content_floor).clamp(0.0, 1.0),
        }
    }

    /// Sheet offset when fully open (`<= 0`).
    #[inline]
    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    /// Inner bar travel when fully open (`>= 0`).
    #[inline]
    pub fn inner_bar_travel(&self) -> f64 {
        self.inner_bar_travel
    }

    /// Expanded-content opacity while collapsed.
    #[inline]
    pub fn content_floor(&self) -> f64 {
        self.content_floor
    }

    /// Resting values of the closed state.
    pub fn closed(&self) -> ChannelValues {
        ChannelValues {
            panel_offset: 0.0,
            inner_bar_offset: 0.0,
            wrapper_opacity: 1.0,
            content_opacity: self.content_floor,
        }
    }

    /// Resting values of the open state.
    pub fn open(&self) -> ChannelValues {
        ChannelValues {
            panel_offset: self.max_offset,
            inner_bar_offset: self.inner_bar_travel,
            wrapper_opacity: 0.0,
            content_opacity: 1.0,
        }
    }

    /// Resting values for the given committed state.
    #[inline]
    pub fn resting(&self, open: bool) -> ChannelValues {
        if open { self.open() } else { self.closed() }
    }

    /// Clamp every channel into its range.
    pub fn clamp(&self, values: ChannelValues) -> ChannelValues {
        ChannelValues {
            panel_offset: values.panel_offset.clamp(self.max_offset, 0.0),
            inner_bar_offset: values.inner_bar_offset.clamp(0.0, self.inner_bar_travel),
            wrapper_opacity: values.wrapper_opacity.clamp(0.0, 1.0),
            content_opacity: values.content_opacity.clamp(self.content_floor, 1.0),
        }
    }

    /// Whether every channel lies inside its range.
    pub fn contains(&self, values: &ChannelValues) -> bool {
        (self.max_offset..=0.0).contains(&values.panel_offset)
            && (0.0..=self.inner_bar_travel).contains(&values.inner_bar_offset)
            && (0.0..=1.0).contains(&values.wrapper_opacity)
            && (self.content_floor..=1.0).contains(&values.content_opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> ChannelRange {
        ChannelRange::new(736.0, 48.0, 0.25)
    }

    #[test]
    fn max_offset_is_negative_travel() {
        assert_eq!(range().max_offset(), -736.0);
        assert_eq!(ChannelRange::new(-10.0, 0.0, 0.0).max_offset(), -10.0);
    }

    #[test]
    fn resting_values_are_in_range() {
        let r = range();
        assert!(r.contains(&r.closed()));
        assert!(r.contains(&r.open()));
        assert_eq!(r.resting(false), r.closed());
        assert_eq!(r.resting(true), r.open());
    }

    #[test]
    fn closed_keeps_expanded_content_dimly_visible() {
        assert_eq!(range().closed().content_opacity, 0.25);
        assert_eq!(range().open().content_opacity, 1.0);
    }

    #[test]
    fn clamp_pulls_values_into_range() {
        let r = range();
        let wild = ChannelValues {
            panel_offset: -5000.0,
            inner_bar_offset: 100.0,
            wrapper_opacity: -0.5,
            content_opacity: 1.7,
        };
        let clamped = r.clamp(wild);
        assert!(r.contains(&clamped));
        assert_eq!(clamped.panel_offset, -736.0);
        assert_eq!(clamped.inner_bar_offset, 48.0);
        assert_eq!(clamped.wrapper_opacity, 0.0);
        assert_eq!(clamped.content_opacity, 1.0);
    }

    #[test]
    fn get_set_roundtrip_every_channel() {
        let mut v = ChannelValues::default();
        for (i, c) in Channel::ALL.iter().enumerate() {
            v.set(*c, i as f64 + 0.5);
        }
        for (i, c) in Channel::ALL.iter().enumerate() {
            assert_eq!(v.get(*c), i as f64 + 0.5, "{}", c.label());
        }
    }

    #[test]
    fn non_finite_inputs_collapse_to_zero() {
        let r = ChannelRange::new(f64::NAN, f64::INFINITY, f64::NAN);
        assert_eq!(r.max_offset(), 0.0);
        assert_eq!(r.inner_bar_travel(), 0.0);
        assert_eq!(r.content_floor(), 0.0);

        let r = ChannelRange::new(736.0, 48.0, f64::NAN);
        let dragged = ChannelValues {
            panel_offset: -50.0,
            inner_bar_offset: 3.0,
            wrapper_opacity: 0.9,
            content_opacity: 0.3,
        };
        let clamped = r.clamp(dragged);
        assert_eq!(clamped, dragged);
        assert!(r.contains(&r.closed()));
    }
}
