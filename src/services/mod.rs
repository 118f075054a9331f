//! External capabilities consumed by the assistant
//!
//! Every side effect that leaves the process goes through one of these
//! narrow traits so that tests can swap in fakes:
//! - Transcriber: microphone capture + speech-to-text
//! - Synthesizer: text-to-speech playback
//! - ReferenceLookup: encyclopedic summaries
//! - Browser: hand a URL to the OS
//! - Clock: local wall-clock time

mod browser;
mod clock;
mod transcriber;
mod voice;
mod wikipedia;

use async_trait::async_trait;
use chrono::NaiveDateTime;

pub use browser::SystemBrowser;
pub use clock::SystemClock;
pub use transcriber::CommandTranscriber;
pub use voice::{MutedVoice, SystemVoice};
pub use wikipedia::{WikipediaClient, DEFAULT_ENDPOINT as WIKIPEDIA_ENDPOINT};

/// Failures while capturing and transcribing an utterance
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no speech detected")]
    NoSpeechDetected,

    #[error("recognition service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Failures while speaking a reply
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("cannot speak empty text")]
    EmptyText,

    #[error("speech synthesis failed: {0}")]
    Failed(String),
}

/// Failures from the reference lookup service
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("no article found for {0:?}")]
    NotFound(String),

    #[error("{0:?} is ambiguous")]
    Ambiguous(String),

    #[error("unexpected lookup response: {0}")]
    Malformed(String),
}

/// Failure to hand a URL to the OS
#[derive(Debug, thiserror::Error)]
#[error("failed to open {url}: {source}")]
pub struct BrowserError {
    pub url: String,
    #[source]
    pub source: std::io::Error,
}

/// Captures one utterance and returns its transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self) -> Result<String, CaptureError>;
}

/// Speaks text aloud, returning once playback has finished
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), SynthesisError>;
}

/// Produces a short plain-text summary for a topic
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn summarize(&self, topic: &str) -> Result<String, LookupError>;
}

/// Opens URLs with the default handler
pub trait Browser: Send + Sync {
    fn open(&self, url: &str) -> Result<(), BrowserError>;
}

/// Source of local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
