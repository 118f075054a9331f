//! Speech capture through an external transcription command
//!
//! The command is expected to record one utterance from the microphone and
//! print its transcription on stdout (e.g. a whisper.cpp wrapper script).

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::{CaptureError, Transcriber};

/// Runs a configured command per capture and reads the transcript from stdout
#[derive(Debug, Clone, Default)]
pub struct CommandTranscriber {
    command: Option<(String, Vec<String>)>,
}

impl CommandTranscriber {
    /// Parse a whitespace-separated command line; blank or missing means unconfigured
    pub fn new(command_line: Option<&str>) -> Self {
        let command = command_line.and_then(|line| {
            let mut parts = line.split_whitespace().map(str::to_string);
            parts.next().map(|program| (program, parts.collect()))
        });
        Self { command }
    }

    pub fn is_configured(&self) -> bool {
        self.command.is_some()
    }
}

#[async_trait]
impl Transcriber for CommandTranscriber {
    async fn transcribe(&self) -> Result<String, CaptureError> {
        let (program, args) = self.command.as_ref().ok_or_else(|| {
            CaptureError::ServiceUnavailable("no transcription command configured".to_string())
        })?;

        info!(%program, "listening");
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| CaptureError::ServiceUnavailable(format!("{}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::ServiceUnavailable(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(%transcript, "transcription received");
        if transcript.is_empty() {
            return Err(CaptureError::NoSpeechDetected);
        }

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_is_unavailable() {
        let transcriber = CommandTranscriber::new(None);
        assert!(!transcriber.is_configured());
        assert!(matches!(
            transcriber.transcribe().await,
            Err(CaptureError::ServiceUnavailable(_))
        ));
        assert!(!CommandTranscriber::new(Some("  ")).is_configured());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_reads_stdout() {
        let transcriber = CommandTranscriber::new(Some("echo Hello there"));
        let text = tokio_test::assert_ok!(transcriber.transcribe().await);
        assert_eq!(text, "Hello there");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_silent_command_is_no_speech() {
        let transcriber = CommandTranscriber::new(Some("true"));
        assert!(matches!(
            transcriber.transcribe().await,
            Err(CaptureError::NoSpeechDetected)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_unavailable() {
        let transcriber = CommandTranscriber::new(Some("false"));
        assert!(matches!(
            transcriber.transcribe().await,
            Err(CaptureError::ServiceUnavailable(_))
        ));
    }
}
