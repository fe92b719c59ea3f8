#![forbid(unsafe_code)]

//! Draggable bottom panel for swipeup.
//!
//! # Role in swipeup
//! A panel sits at the bottom of the screen as a collapsed bar and can be
//! dragged up into a full-screen sheet. While the finger moves, four channels
//! follow it proportionally; on release the panel decides between open and
//! closed from the velocity-weighted distance and animates every channel to
//! the resting values of that state before committing.
//!
//! # Primary responsibilities
//! - **[`GestureArbiter`]**: claim rules, live drag mapping, release and
//!   pre-emption decisions, all as pure functions of [`PanelState`].
//! - **[`TransitionController`]**: `open()`/`close()` commits driven by a
//!   parallel channel batch; `is_open` flips only when every channel settles.
//! - **[`SwipePanel`]**: the widget. Implements
//!   [`GestureResponder`](swipeup_core::pointer::GestureResponder), fires the
//!   lifecycle callbacks, and hands [`SwipeHandle`]s to content.
//! - **[`PanelView`]**: assembles collapsed/expanded/player content, freezing
//!   the expanded slot between commits.
//!
//! # How it fits in the system
//! Hosts feed pointer events through a
//! [`GestureSession`](swipeup_core::pointer::GestureSession) (or their own
//! dispatcher), call [`SwipePanel::tick`] once per frame, and paint from
//! [`SwipePanel::frame`]. Configuration comes from [`PanelConfig`], loadable
//! from TOML/JSON with the `config` feature.

pub mod arbiter;
pub mod config;
pub mod freeze;
pub mod handle;
pub mod panel;
pub mod state;
pub mod transition;
pub mod view;

pub use arbiter::{ClaimDecision, ClaimGate, GestureArbiter, ReleaseDecision};
pub use config::{ConfigError, PanelConfig};
pub use freeze::Frozen;
pub use handle::SwipeHandle;
pub use panel::SwipePanel;
pub use state::{CommitTarget, PanelState};
pub use transition::{PanelEvent, TransitionController};
pub use view::{PanelContent, PanelFrame, PanelView, RenderedPanel};
