//! Core session state machine
//!
//! Handles transitions between Listening and Paused. A stop command pauses
//! the session; only an explicit voice capture resumes it.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::events::SessionEvent;

/// The two possible states of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Replies are spoken
    #[default]
    Listening,
    /// Replies are displayed only
    Paused,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Listening => write!(f, "Listening"),
            State::Paused => write!(f, "Paused"),
        }
    }
}

/// One user's session, passed by `&mut` into every interaction
pub struct Session {
    /// Current state
    state: State,
    /// A note was requested and its body has not arrived yet
    pending_note: bool,
    /// Time the current state was entered
    state_entered_at: Instant,
    /// Channel for emitting session events
    event_tx: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Create a new session in the Listening state
    pub fn new(event_tx: broadcast::Sender<SessionEvent>) -> Self {
        Self {
            state: State::Listening,
            pending_note: false,
            state_entered_at: Instant::now(),
            event_tx,
        }
    }

    /// Get the current state
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == State::Listening
    }

    pub fn pending_note(&self) -> bool {
        self.pending_note
    }

    /// Voice capture was initiated; resumes listening before matching
    pub fn begin_capture(&mut self) {
        if self.state == State::Paused {
            self.transition_to(State::Listening);
        }
        self.emit(SessionEvent::CaptureStarted);
    }

    /// Stop command received
    pub fn pause(&mut self) {
        if self.state == State::Listening {
            self.transition_to(State::Paused);
        }
    }

    /// Wait for a note body in the next interaction
    pub fn request_note(&mut self) {
        self.pending_note = true;
        self.emit(SessionEvent::NoteRequested);
    }

    /// The awaited note body arrived
    pub fn clear_pending_note(&mut self) {
        self.pending_note = false;
    }

    /// Broadcast an event; having no subscribers is fine
    pub fn emit(&self, event: SessionEvent) {
        debug!(%event, "emitting session event");
        let _ = self.event_tx.send(event);
    }

    /// Perform a state transition
    fn transition_to(&mut self, new_state: State) {
        let old_state = self.state;
        let duration_ms = self.state_entered_at.elapsed().as_millis() as u64;

        info!(
            from = %old_state,
            to = %new_state,
            duration_ms = duration_ms,
            "session transition"
        );

        self.state = new_state;
        self.state_entered_at = Instant::now();

        let event = match new_state {
            State::Listening => SessionEvent::ListeningResumed,
            State::Paused => SessionEvent::ListeningPaused {
                listened_ms: duration_ms,
            },
        };
        self.emit(event);
    }
}
