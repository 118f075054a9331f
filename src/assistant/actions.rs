//! Per-intent action executors
//!
//! Maps a matched intent to a reply, performing the intent's side effect on
//! the way. Failures from the outside world become reply text here and go
//! no further.

use tracing::{info, warn};

use crate::events::SessionEvent;
use crate::intent::{Intent, Site};
use crate::notes::{Note, NotesError};
use crate::state::Session;

use super::{Assistant, Reply};

pub const EMPTY_INPUT_REPLY: &str = "Say something again, please.";
pub const GREETING_REPLY: &str = "Hello! How can I help you?";
pub const LOOKUP_FAILED_REPLY: &str = "Couldn't fetch that topic on Wikipedia.";
pub const LOOKUP_MISSING_TOPIC_REPLY: &str = "Tell me what to search on Wikipedia.";
pub const NOTE_SAVED_REPLY: &str = "Note saved!";
pub const NOTE_WAITING_REPLY: &str = "Waiting for your note. Type or say it next.";
pub const NOTE_FAILED_REPLY: &str = "I couldn't save that note.";
pub const NO_NOTES_REPLY: &str = "No notes yet.";
pub const NOTES_UNREADABLE_REPLY: &str = "I couldn't read your notes.";
pub const STOP_REPLY: &str = "Goodbye! Listening paused.";
pub const STOP_ANNOUNCEMENT: &str =
    "Goodbye! I'll stop listening until you start a new voice capture.";
pub const UNRECOGNIZED_REPLY: &str = "I didn't recognize that command.";

/// Salutation for the local hour of day
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning!",
        12..=17 => "Good afternoon!",
        _ => "Good evening!",
    }
}

impl Assistant {
    /// Run the executor for `intent` and produce its reply
    pub async fn execute(&self, session: &mut Session, intent: Intent) -> Reply {
        let text = match &intent {
            Intent::EmptyInput => EMPTY_INPUT_REPLY.to_string(),
            Intent::Greeting => GREETING_REPLY.to_string(),
            Intent::Lookup { topic } => self.summarize_topic(topic).await,
            Intent::LookupMissingTopic => LOOKUP_MISSING_TOPIC_REPLY.to_string(),
            Intent::OpenSite { site } => self.open_site(*site),
            Intent::ReadClock => format!("The time is {}.", self.clock.now().format("%H:%M:%S")),
            Intent::SaveNote => {
                session.request_note();
                NOTE_WAITING_REPLY.to_string()
            }
            Intent::ReadNotes => self.read_notes().await,
            Intent::StopSession => {
                session.pause();
                STOP_REPLY.to_string()
            }
            Intent::Unrecognized => UNRECOGNIZED_REPLY.to_string(),
        };

        session.emit(SessionEvent::CommandHandled {
            intent: intent.to_string(),
        });

        // The farewell is spoken even though the session just paused
        let farewell = matches!(intent, Intent::StopSession);
        let reply = Reply::new(text, Some(intent));
        if farewell {
            reply.with_announcement(STOP_ANNOUNCEMENT)
        } else {
            reply
        }
    }

    /// Store `body` as a note
    ///
    /// A blank body leaves the pending flag as it was: a note already
    /// requested keeps waiting, otherwise nothing is armed.
    pub async fn save_note(&self, session: &mut Session, body: &str) -> Reply {
        let note = match Note::new(self.clock.now(), body) {
            Ok(note) => note,
            Err(NotesError::NoteBodyMissing) => {
                return Reply::new(NOTE_WAITING_REPLY, Some(Intent::SaveNote));
            }
            Err(e) => {
                warn!(?e, "note rejected");
                return Reply::new(NOTE_FAILED_REPLY, Some(Intent::SaveNote));
            }
        };

        session.clear_pending_note();
        match self.notes.append(&note).await {
            Ok(()) => {
                session.emit(SessionEvent::NoteSaved);
                Reply::new(NOTE_SAVED_REPLY, Some(Intent::SaveNote))
            }
            Err(e) => {
                warn!(?e, "failed to append note");
                Reply::new(NOTE_FAILED_REPLY, Some(Intent::SaveNote))
            }
        }
    }

    async fn summarize_topic(&self, topic: &str) -> String {
        match self.lookup.summarize(topic).await {
            Ok(summary) => {
                info!(topic, "lookup succeeded");
                format!("According to Wikipedia: {}", summary)
            }
            Err(e) => {
                warn!(topic, error = %e, "lookup failed");
                LOOKUP_FAILED_REPLY.to_string()
            }
        }
    }

    fn open_site(&self, site: Site) -> String {
        if let Err(e) = self.browser.open(site.url()) {
            warn!(error = %e, "browser hand-off failed");
        }
        format!("Opening {}.", site)
    }

    async fn read_notes(&self) -> String {
        match self.notes.read_all().await {
            Ok(Some(contents)) => format!("Your notes:\n\n{}", contents),
            Ok(None) => NO_NOTES_REPLY.to_string(),
            Err(e) => {
                warn!(error = %e, "failed to read notes");
                NOTES_UNREADABLE_REPLY.to_string()
            }
        }
    }
}
