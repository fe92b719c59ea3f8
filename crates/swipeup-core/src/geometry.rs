#![forbid(unsafe_code)]

//! Viewport dimensions.

/// Screen dimensions in logical pixels.
///
/// Read once when a panel is built; the panel does not track later resizes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check if the viewport has no usable area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Vertical distance the panel travels between collapsed and expanded,
    /// given the height of the visible collapsed bar.
    ///
    /// Never negative: a bar taller than the screen has no travel.
    #[inline]
    pub fn open_travel(&self, collapsed_height: f64) -> f64 {
        (self.height - collapsed_height).max(0.0)
    }
}
