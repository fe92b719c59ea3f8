#![forbid(unsafe_code)]

//! Panel configuration.
//!
//! Every tunable of the panel lives in one [`PanelConfig`]. With the `config`
//! feature it can be loaded from TOML or JSON; missing fields keep their
//! defaults, so a file only lists what it changes.
//!
//! ```toml
//! # panel.toml
//! collapsed_height = 72.0
//! close_threshold_divisor = 5.0
//!
//! [motion]
//! kind = "spring"
//! stiffness = 220.0
//! damping = 24.0
//! ```
//!
//! ```rust,ignore
//! let config = PanelConfig::from_toml_file("panel.toml")?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use swipeup_core::animation::spring::{MAX_DAMPING, MAX_STIFFNESS, MIN_STIFFNESS};
use swipeup_core::animation::{CommitMotion, Easing};
use swipeup_core::pointer::DEFAULT_VELOCITY_WINDOW;

/// Height of the visible collapsed bar, in pixels.
pub const DEFAULT_COLLAPSED_HEIGHT: f64 = 64.0;
/// Inner bar travel, in pixels.
pub const DEFAULT_INNER_BAR_TRAVEL: f64 = 48.0;
/// Expanded-content opacity while collapsed.
pub const DEFAULT_CONTENT_OPACITY_FLOOR: f64 = 0.25;
/// Horizontal-to-vertical ratio at which a gesture stops being "vertical".
pub const DEFAULT_CLAIM_RATIO: f64 = 1.5;
/// Opening needs a weighted drag of `height / 10`.
pub const DEFAULT_OPEN_THRESHOLD_DIVISOR: f64 = 10.0;
/// Closing needs a weighted drag of `height / 7`.
pub const DEFAULT_CLOSE_THRESHOLD_DIVISOR: f64 = 7.0;

// ---------------------------------------------------------------------------
// PanelConfig
// ---------------------------------------------------------------------------

/// Tunables of a swipe panel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PanelConfig {
    /// Height of the collapsed bar left on screen when closed.
    pub collapsed_height: f64,

    /// Travel of the inner bar between closed and open.
    pub inner_bar_travel: f64,

    /// Expanded-content opacity while collapsed.
    pub content_opacity_floor: f64,

    /// A move is claimed only while `|dx| / |dy|` stays below this.
    pub claim_ratio: f64,

    /// Open threshold is `height / open_threshold_divisor`.
    pub open_threshold_divisor: f64,

    /// Close threshold is `height / close_threshold_divisor`.
    pub close_threshold_divisor: f64,

    /// Commit animation.
    pub motion: CommitMotion,

    /// When false the panel can never open.
    pub can_swipe_up: bool,

    /// Lock the drag-to-close gesture whenever the panel opens.
    pub lock_after_open: bool,

    /// Block native scroll views while the panel owns a gesture.
    pub block_native_responder: bool,

    /// Trailing window for release velocity.
    #[cfg_attr(
        feature = "config",
        serde(rename = "velocity_window_ms", with = "duration_ms")
    )]
    pub velocity_window: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            collapsed_height: DEFAULT_COLLAPSED_HEIGHT,
            inner_bar_travel: DEFAULT_INNER_BAR_TRAVEL,
            content_opacity_floor: DEFAULT_CONTENT_OPACITY_FLOOR,
            claim_ratio: DEFAULT_CLAIM_RATIO,
            open_threshold_divisor: DEFAULT_OPEN_THRESHOLD_DIVISOR,
            close_threshold_divisor: DEFAULT_CLOSE_THRESHOLD_DIVISOR,
            motion: CommitMotion::default(),
            can_swipe_up: true,
            lock_after_open: true,
            block_native_responder: true,
            velocity_window: DEFAULT_VELOCITY_WINDOW,
        }
    }
}

impl PanelConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for reduced motion: commits jump on the next tick.
    #[must_use]
    pub fn reduced_motion() -> Self {
        Self::default().motion(CommitMotion::Tween {
            duration: Duration::ZERO,
            easing: Easing::Linear,
        })
    }

    /// Set the collapsed bar height.
    #[must_use]
    pub fn collapsed_height(mut self, height: f64) -> Self {
        self.collapsed_height = height;
        self
    }

    /// Set the inner bar travel.
    #[must_use]
    pub fn inner_bar_travel(mut self, travel: f64) -> Self {
        self.inner_bar_travel = travel;
        self
    }

    /// Set the expanded-content opacity floor.
    #[must_use]
    pub fn content_opacity_floor(mut self, floor: f64) -> Self {
        self.content_opacity_floor = floor;
        self
    }

    /// Set the claim ratio.
    #[must_use]
    pub fn claim_ratio(mut self, ratio: f64) -> Self {
        self.claim_ratio = ratio;
        self
    }

    /// Set the open threshold divisor.
    #[must_use]
    pub fn open_threshold_divisor(mut self, divisor: f64) -> Self {
        self.open_threshold_divisor = divisor;
        self
    }

    /// Set the close threshold divisor.
    #[must_use]
    pub fn close_threshold_divisor(mut self, divisor: f64) -> Self {
        self.close_threshold_divisor = divisor;
        self
    }

    /// Set the commit motion.
    #[must_use]
    pub fn motion(mut self, motion: CommitMotion) -> Self {
        self.motion = motion;
        self
    }

    /// Enable or disable the open path.
    #[must_use]
    pub fn can_swipe_up(mut self, enabled: bool) -> Self {
        self.can_swipe_up = enabled;
        self
    }

    /// Lock drag-to-close after every open.
    #[must_use]
    pub fn lock_after_open(mut self, lock: bool) -> Self {
        self.lock_after_open = lock;
        self
    }

    /// Block native responders while claimed.
    #[must_use]
    pub fn block_native_responder(mut self, block: bool) -> Self {
        self.block_native_responder = block;
        self
    }

    /// Set the velocity window.
    #[must_use]
    pub fn velocity_window(mut self, window: Duration) -> Self {
        self.velocity_window = window;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSerialize)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.collapsed_height >= 0.0) {
            errors.push(format!(
                "collapsed_height must be >= 0, got {}",
                self.collapsed_height
            ));
        }
        if !(self.inner_bar_travel >= 0.0) {
            errors.push(format!(
                "inner_bar_travel must be >= 0, got {}",
                self.inner_bar_travel
            ));
        }
        if !(0.0..=1.0).contains(&self.content_opacity_floor) {
            errors.push(format!(
                "content_opacity_floor must be in [0, 1], got {}",
                self.content_opacity_floor
            ));
        }
        if !(self.claim_ratio > 0.0) {
            errors.push(format!("claim_ratio must be > 0, got {}", self.claim_ratio));
        }
        if !(self.open_threshold_divisor > 0.0) {
            errors.push(format!(
                "open_threshold_divisor must be > 0, got {}",
                self.open_threshold_divisor
            ));
        }
        if !(self.close_threshold_divisor > 0.0) {
            errors.push(format!(
                "close_threshold_divisor must be > 0, got {}",
                self.close_threshold_divisor
            ));
        }
        if let CommitMotion::Spring { stiffness, damping } = self.motion {
            if !(MIN_STIFFNESS..=MAX_STIFFNESS).contains(&stiffness) {
                errors.push(format!(
                    "motion.stiffness must be in [{MIN_STIFFNESS}, {MAX_STIFFNESS}], got {stiffness}"
                ));
            }
            if !(damping > 0.0 && damping <= MAX_DAMPING) {
                errors.push(format!(
                    "motion.damping must be in (0, {MAX_DAMPING}], got {damping}"
                ));
            }
        }
        if self.velocity_window.is_zero() {
            errors.push("velocity_window must be > 0".into());
        }

        errors
    }

    #[cfg(feature = "config")]
    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error loading a [`PanelConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config")]
    #[error("TOML serialize error: {0}")]
    TomlSerialize(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(feature = "config")]
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
