//! File-backed notes log

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Timestamp layout used for each line, e.g. `2025-03-14 09:26:53.589793`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Errors raised by the notes store
#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    #[error("note body is missing")]
    NoteBodyMissing,

    #[error("notes file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single saved note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub timestamp: NaiveDateTime,
    pub body: String,
}

impl Note {
    /// Build a note, rejecting blank bodies
    ///
    /// Line breaks become single spaces so each note stays on one line.
    pub fn new(timestamp: NaiveDateTime, body: &str) -> Result<Self, NotesError> {
        let body = body
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if body.is_empty() {
            return Err(NotesError::NoteBodyMissing);
        }
        Ok(Self { timestamp, body })
    }

    /// Serialized line, without the trailing newline
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.timestamp.format(TIMESTAMP_FORMAT), self.body)
    }
}

/// Append-only notes file
#[derive(Debug, Clone)]
pub struct NotesStore {
    path: PathBuf,
}

impl NotesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a note, creating the file and its directory on first use
    pub async fn append(&self, note: &Note) -> Result<(), NotesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        let mut line = note.to_line();
        line.push('\n');
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        info!(path = ?self.path, chars = note.body.len(), "note saved");
        Ok(())
    }

    /// Full file contents, or `None` when no note has been saved yet
    pub async fn read_all(&self) -> Result<Option<String>, NotesError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no notes file yet");
                Ok(None)
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> NotesError {
        NotesError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
