//! Intent recognition for user commands
//!
//! Raw input is first normalized to lowercase alphanumerics and spaces,
//! then matched against an ordered keyword table:
//! - Greeting, Lookup, OpenSite, ReadClock
//! - SaveNote, ReadNotes, StopSession
//! - EmptyInput and Unrecognized as fallbacks

mod matcher;
mod normalize;

pub use matcher::{match_intent, Intent, Site};
pub use normalize::normalize;
