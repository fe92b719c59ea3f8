#![forbid(unsafe_code)]

//! Scripted replays for swipeup panels.
//!
//! `swipeup-replay run --script gestures.jsonl` feeds each scripted pointer
//! event and programmatic call through a real [`SwipePanel`] and prints the
//! resulting frames as JSON Lines, so gesture tuning can be diffed without a
//! device.
//!
//! [`SwipePanel`]: swipeup_panel::SwipePanel

pub mod cli;
pub mod error;
pub mod logging;
pub mod replay;
pub mod script;

pub use cli::{run, run_from_env};
pub use error::{ReplayError, Result};
pub use replay::{ReplaySummary, Replayer};
pub use script::{Script, Step};
