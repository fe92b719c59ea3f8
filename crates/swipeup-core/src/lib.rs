#![forbid(unsafe_code)]

//! Core: channels, animation drivers, and pointer tracking for swipeup.
//!
//! # Role in swipeup
//! `swipeup-core` holds everything that does not depend on the panel's
//! policy: the numeric channels a panel animates, the easing curves and
//! drivers that move them, and the pointer bookkeeping a host gesture system
//! performs before handing accumulated deltas to a responder.
//!
//! # Primary responsibilities
//! - **Channels**: [`channel::Channel`], [`channel::ChannelValues`] and the
//!   resting values that define the closed and open states.
//! - **Animation**: [`animation::Easing`], [`animation::Tween`],
//!   [`animation::Spring`] and the parallel [`animation::ChannelBatch`].
//! - **Pointer**: [`pointer::PointerTracker`] and the
//!   [`pointer::GestureResponder`] seam.
//!
//! # How it fits in the system
//! `swipeup-panel` owns the gesture arbitration and commit state machine and
//! builds on these primitives. Nothing here allocates per frame beyond the
//! pointer sample window.

pub mod animation;
pub mod channel;
pub mod geometry;
pub mod pointer;
