//! Session state module.
//!
//! Per-conversation mutable memory, passed explicitly into each decision
//! call so one engine instance can serve any number of isolated sessions.

mod state;

pub use state::{Scroll, SessionState};
