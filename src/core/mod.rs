//! Picker state and its async driver
//!
//! `Controller` owns the selection, filter, expansion and transcript state.
//! `Session` feeds it catalog loads and relay replies.

mod controller;
mod session;

pub use controller::{Controller, Notice, Refusal, RelayPurpose, RelayState};
pub use session::Session;
