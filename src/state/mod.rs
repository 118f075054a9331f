//! Session state module
//!
//! Provides an explicit state machine with two states:
//! - Listening: replies are spoken aloud (initial)
//! - Paused: replies are only displayed, until the next voice capture
//!
//! The session also tracks whether a note body is awaited.

mod machine;

pub use machine::{Session, State};
