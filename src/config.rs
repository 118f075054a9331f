//! Configuration loading and management

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::services::WIKIPEDIA_ENDPOINT;

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Append-only notes log
    pub notes_path: PathBuf,

    /// Path to the Unix domain socket for IPC
    pub socket_path: PathBuf,

    /// Serve the IPC socket alongside the terminal
    pub ipc_enabled: bool,

    /// MediaWiki action API endpoint
    pub wikipedia_url: String,

    /// Lead sentences requested per summary
    pub summary_sentences: u32,

    pub lookup_timeout_secs: u64,

    /// Speak replies aloud
    pub speech_enabled: bool,

    /// Words per minute for the platform voice
    pub speech_rate: u32,

    /// Overrides the platform speech command
    pub tts_command: Option<String>,

    /// Records one utterance and prints its transcription
    pub transcribe_command: Option<String>,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup, falling back to defaults
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());

        let data_dir = match var("ASSISTANT_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = var("HOME").context("HOME is not set")?;
                PathBuf::from(home)
                    .join(".local")
                    .join("share")
                    .join("voice-assistant")
            }
        };

        let notes_path = var("ASSISTANT_NOTES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("notes.txt"));
        let socket_path = var("ASSISTANT_SOCKET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("assistant.sock"));

        Ok(Self {
            notes_path,
            socket_path,
            ipc_enabled: parse_flag("ASSISTANT_IPC", var("ASSISTANT_IPC"), false)?,
            wikipedia_url: var("ASSISTANT_WIKIPEDIA_URL")
                .unwrap_or_else(|| WIKIPEDIA_ENDPOINT.to_string()),
            summary_sentences: parse_number(
                "ASSISTANT_SUMMARY_SENTENCES",
                var("ASSISTANT_SUMMARY_SENTENCES"),
                2,
            )?,
            lookup_timeout_secs: parse_number(
                "ASSISTANT_LOOKUP_TIMEOUT_SECS",
                var("ASSISTANT_LOOKUP_TIMEOUT_SECS"),
                10,
            )?,
            speech_enabled: parse_flag("ASSISTANT_SPEECH", var("ASSISTANT_SPEECH"), true)?,
            speech_rate: parse_number("ASSISTANT_SPEECH_RATE", var("ASSISTANT_SPEECH_RATE"), 180)?,
            tts_command: var("ASSISTANT_TTS_CMD"),
            transcribe_command: var("ASSISTANT_TRANSCRIBE_CMD"),
            data_dir,
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create {}", self.data_dir.display()))?;
        Ok(())
    }
}

fn parse_flag(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => bail!("{key}: expected a boolean, got {other:?}"),
    }
}

fn parse_number<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(value) = value else {
        return Ok(default);
    };
    let parsed: T = value
        .trim()
        .parse()
        .with_context(|| format!("{key}: expected a number, got {value:?}"))?;
    if parsed < T::from(1) {
        bail!("{key}: must be at least 1");
    }
    Ok(parsed)
}
