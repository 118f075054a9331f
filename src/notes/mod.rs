//! Notes store module
//!
//! Append-only text log of timestamped notes, one `"<timestamp>: <body>"`
//! line per note. Notes are never edited or deleted.

mod store;

pub use store::{Note, NotesError, NotesStore};
