//! Events module for session transitions
//!
//! Structured events emitted while handling interactions: listening
//! pause/resume, voice capture, note flow and handled commands.

use serde::{Deserialize, Serialize};

/// Events emitted by the session during interactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Listening resumed by a new voice capture
    ListeningResumed,

    /// Listening paused by a stop command
    ListeningPaused {
        /// How long the session had been listening, in milliseconds
        listened_ms: u64,
    },

    /// Voice capture started
    CaptureStarted,

    /// Voice capture finished
    CaptureFinished {
        /// Whether a transcription came back
        heard: bool,
    },

    /// A note was requested; the next input is its body
    NoteRequested,

    /// A note was appended to the store
    NoteSaved,

    /// A command was matched and executed
    CommandHandled {
        /// Display form of the matched intent
        intent: String,
    },
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::ListeningResumed => write!(f, "LISTENING_RESUMED"),
            SessionEvent::ListeningPaused { listened_ms } => {
                write!(f, "LISTENING_PAUSED ({}ms)", listened_ms)
            }
            SessionEvent::CaptureStarted => write!(f, "CAPTURE_STARTED"),
            SessionEvent::CaptureFinished { heard } => {
                write!(f, "CAPTURE_FINISHED (heard: {})", heard)
            }
            SessionEvent::NoteRequested => write!(f, "NOTE_REQUESTED"),
            SessionEvent::NoteSaved => write!(f, "NOTE_SAVED"),
            SessionEvent::CommandHandled { intent } => write!(f, "COMMAND_HANDLED ({})", intent),
        }
    }
}
