//! In-memory fakes for the external capabilities

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;
use tokio::sync::broadcast;

use crate::assistant::{Assistant, Capabilities};
use crate::events::SessionEvent;
use crate::notes::NotesStore;
use crate::services::{
    Browser, BrowserError, CaptureError, Clock, LookupError, ReferenceLookup, SynthesisError,
    Synthesizer, Transcriber,
};
use crate::state::Session;

/// Returns queued transcriptions in order; an empty queue means silence
#[derive(Default)]
pub struct FakeTranscriber {
    queue: Mutex<VecDeque<Result<String, CaptureError>>>,
}

impl FakeTranscriber {
    pub fn push(&self, result: Result<String, CaptureError>) {
        self.queue.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self) -> Result<String, CaptureError> {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CaptureError::NoSpeechDetected))
    }
}

/// Records everything it is asked to say
#[derive(Default)]
pub struct RecordingVoice {
    spoken: Mutex<Vec<String>>,
    failing: Mutex<bool>,
}

impl RecordingVoice {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }
}

#[async_trait]
impl Synthesizer for RecordingVoice {
    async fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        if *self.failing.lock().unwrap() {
            return Err(SynthesisError::Failed("forced failure".into()));
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Answers every topic with one canned summary, or fails
#[derive(Default)]
pub struct FakeLookup {
    summary: Mutex<Option<String>>,
    topics: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn set_summary(&self, summary: &str) {
        *self.summary.lock().unwrap() = Some(summary.to_string());
    }

    pub fn set_failure(&self) {
        *self.summary.lock().unwrap() = None;
    }

    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReferenceLookup for FakeLookup {
    async fn summarize(&self, topic: &str) -> Result<String, LookupError> {
        self.topics.lock().unwrap().push(topic.to_string());
        self.summary
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| LookupError::NotFound(topic.to_string()))
    }
}

/// Records opened URLs
#[derive(Default)]
pub struct RecordingBrowser {
    opened: Mutex<Vec<String>>,
    failing: Mutex<bool>,
}

impl RecordingBrowser {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }
}

impl Browser for RecordingBrowser {
    fn open(&self, url: &str) -> Result<(), BrowserError> {
        if *self.failing.lock().unwrap() {
            return Err(BrowserError {
                url: url.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no browser"),
            });
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Always 2025-06-01 14:05:09
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }
}

/// An assistant wired to fakes, with a notes file in a temp directory
pub struct Harness {
    pub assistant: Arc<Assistant>,
    pub session: Session,
    pub events: broadcast::Sender<SessionEvent>,
    pub transcriber: Arc<FakeTranscriber>,
    pub voice: Arc<RecordingVoice>,
    pub lookup: Arc<FakeLookup>,
    pub browser: Arc<RecordingBrowser>,
    _dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = Arc::new(FakeTranscriber::default());
        let voice = Arc::new(RecordingVoice::default());
        let lookup = Arc::new(FakeLookup::default());
        let browser = Arc::new(RecordingBrowser::default());

        let assistant = Arc::new(Assistant::new(
            Capabilities {
                transcriber: transcriber.clone(),
                voice: voice.clone(),
                lookup: lookup.clone(),
                browser: browser.clone(),
                clock: Arc::new(FixedClock),
            },
            NotesStore::new(dir.path().join("notes.txt")),
        ));

        let (events, _) = broadcast::channel(64);
        let session = Session::new(events.clone());

        Self {
            assistant,
            session,
            events,
            transcriber,
            voice,
            lookup,
            browser,
            _dir: dir,
        }
    }
}
