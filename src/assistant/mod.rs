//! Interaction handling
//!
//! One interaction is a single round of normalize -> match -> execute ->
//! deliver. Typed text and voice capture share the same path; voice capture
//! additionally resumes a paused session first.

mod actions;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::events::SessionEvent;
use crate::intent::{match_intent, normalize, Intent};
use crate::notes::NotesStore;
use crate::services::{
    Browser, CaptureError, Clock, CommandTranscriber, MutedVoice, ReferenceLookup,
    Synthesizer, SystemBrowser, SystemClock, SystemVoice, Transcriber, WikipediaClient,
};
use crate::state::Session;

pub use actions::greeting_for_hour;

pub const NO_SPEECH_REPLY: &str = "Didn't catch that.";
pub const SERVICE_UNAVAILABLE_REPLY: &str = "Speech service unavailable.";

/// Result of one interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Text shown to the user, and spoken while listening
    pub text: String,
    /// Intent that produced the reply; `None` when capture failed
    pub intent: Option<Intent>,
    /// Spoken regardless of the listening state
    pub announcement: Option<String>,
}

impl Reply {
    pub fn new(text: impl Into<String>, intent: Option<Intent>) -> Self {
        Self {
            text: text.into(),
            intent,
            announcement: None,
        }
    }

    pub fn with_announcement(mut self, announcement: impl Into<String>) -> Self {
        self.announcement = Some(announcement.into());
        self
    }
}

/// External capabilities the assistant drives
#[derive(Clone)]
pub struct Capabilities {
    pub transcriber: Arc<dyn Transcriber>,
    pub voice: Arc<dyn Synthesizer>,
    pub lookup: Arc<dyn ReferenceLookup>,
    pub browser: Arc<dyn Browser>,
    pub clock: Arc<dyn Clock>,
}

/// Command assistant wired to its capabilities and notes store
pub struct Assistant {
    transcriber: Arc<dyn Transcriber>,
    voice: Arc<dyn Synthesizer>,
    lookup: Arc<dyn ReferenceLookup>,
    browser: Arc<dyn Browser>,
    clock: Arc<dyn Clock>,
    notes: NotesStore,
}

impl Assistant {
    pub fn new(capabilities: Capabilities, notes: NotesStore) -> Self {
        Self {
            transcriber: capabilities.transcriber,
            voice: capabilities.voice,
            lookup: capabilities.lookup,
            browser: capabilities.browser,
            clock: capabilities.clock,
            notes,
        }
    }

    /// Wire the production capabilities described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let voice: Arc<dyn Synthesizer> = if !config.speech_enabled {
            Arc::new(MutedVoice)
        } else {
            let voice = config
                .tts_command
                .as_deref()
                .and_then(SystemVoice::from_command_line)
                .unwrap_or_else(|| SystemVoice::platform_default(config.speech_rate));
            info!(program = voice.program(), "speaking replies");
            Arc::new(voice)
        };

        let lookup = WikipediaClient::new(
            config.wikipedia_url.clone(),
            config.summary_sentences,
            Duration::from_secs(config.lookup_timeout_secs),
        )
        .context("failed to build Wikipedia client")?;

        let transcriber = CommandTranscriber::new(config.transcribe_command.as_deref());
        if !transcriber.is_configured() {
            warn!("no transcription command configured - voice capture disabled");
        }

        Ok(Self::new(
            Capabilities {
                transcriber: Arc::new(transcriber),
                voice,
                lookup: Arc::new(lookup),
                browser: Arc::new(SystemBrowser),
                clock: Arc::new(SystemClock),
            },
            NotesStore::new(config.notes_path.clone()),
        ))
    }

    pub fn notes(&self) -> &NotesStore {
        &self.notes
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Handle a typed command and deliver the reply
    pub async fn handle_typed(&self, session: &mut Session, raw: &str) -> Reply {
        let reply = self.dispatch(session, raw).await;
        self.deliver(session, &reply).await;
        reply
    }

    /// Capture an utterance, handle it and deliver the reply
    pub async fn handle_voice(&self, session: &mut Session) -> Reply {
        session.begin_capture();

        let transcript = match self.transcriber.transcribe().await {
            Ok(transcript) => transcript,
            Err(e) => {
                session.emit(SessionEvent::CaptureFinished { heard: false });
                return match e {
                    CaptureError::NoSpeechDetected => {
                        info!("no speech detected");
                        Reply::new(NO_SPEECH_REPLY, None)
                    }
                    CaptureError::ServiceUnavailable(reason) => {
                        warn!(%reason, "speech recognition unavailable");
                        Reply::new(SERVICE_UNAVAILABLE_REPLY, None)
                    }
                };
            }
        };

        session.emit(SessionEvent::CaptureFinished { heard: true });
        info!(heard = %transcript, "utterance captured");

        let reply = self.dispatch(session, &transcript).await;
        self.deliver(session, &reply).await;
        reply
    }

    /// Show the notes log without going through keyword matching
    pub async fn show_notes(&self, session: &mut Session) -> Reply {
        self.execute(session, Intent::ReadNotes).await
    }

    /// Route raw input: a pending note takes it verbatim, otherwise match it
    async fn dispatch(&self, session: &mut Session, raw: &str) -> Reply {
        if session.pending_note() {
            return self.save_note(session, raw).await;
        }

        let query = normalize(raw);
        let intent = match_intent(&query);
        info!(%query, %intent, "handling command");
        self.execute(session, intent).await
    }

    /// Speak the announcement always and the reply only while listening
    async fn deliver(&self, session: &Session, reply: &Reply) {
        if let Some(announcement) = &reply.announcement {
            self.speak(announcement).await;
        }
        if session.is_listening() {
            self.speak(&reply.text).await;
        }
    }

    async fn speak(&self, text: &str) {
        if let Err(e) = self.voice.speak(text).await {
            warn!(error = %e, "speech synthesis failed");
        }
    }
}
