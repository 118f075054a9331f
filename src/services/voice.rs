//! Text-to-speech through a system speech command

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{SynthesisError, Synthesizer};

/// Speaks text by running a speech command with the text as its last argument
#[derive(Debug, Clone)]
pub struct SystemVoice {
    program: String,
    args: Vec<String>,
}

impl SystemVoice {
    /// Build from an explicit program and leading arguments
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `say` on macOS, `espeak` elsewhere, at the given words per minute
    pub fn platform_default(rate: u32) -> Self {
        if cfg!(target_os = "macos") {
            Self::new("say", vec!["-r".to_string(), rate.to_string()])
        } else {
            Self::new("espeak", vec!["-s".to_string(), rate.to_string()])
        }
    }

    /// Parse a whitespace-separated command line such as `piper --voice en`
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Synthesizer for SystemVoice {
    async fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        debug!(program = %self.program, chars = text.len(), "speaking");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .output()
            .await
            .map_err(|e| SynthesisError::Failed(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(SynthesisError::Failed(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        Ok(())
    }
}

/// Synthesizer used when speech output is switched off
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedVoice;

#[async_trait]
impl Synthesizer for MutedVoice {
    async fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        debug!(chars = text.len(), "speech muted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_default_passes_rate() {
        let voice = SystemVoice::platform_default(180);
        assert!(voice.args.contains(&"180".to_string()));
    }

    #[test]
    fn test_from_command_line() {
        let voice = SystemVoice::from_command_line("piper --voice en_US").unwrap();
        assert_eq!(voice.program(), "piper");
        assert_eq!(voice.args, vec!["--voice", "en_US"]);
        assert!(SystemVoice::from_command_line("   ").is_none());
    }

    #[tokio::test]
    async fn test_rejects_empty_text() {
        let voice = SystemVoice::new("true", vec![]);
        assert!(matches!(voice.speak("  ").await, Err(SynthesisError::EmptyText)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_speak_with_succeeding_command() {
        let voice = SystemVoice::new("true", vec![]);
        tokio_test::assert_ok!(voice.speak("hello").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_speak_reports_failing_command() {
        let voice = SystemVoice::new("false", vec![]);
        assert!(matches!(voice.speak("hello").await, Err(SynthesisError::Failed(_))));
    }

    #[tokio::test]
    async fn test_missing_program_is_failure() {
        let voice = SystemVoice::new("definitely-not-a-speech-program", vec![]);
        assert!(matches!(voice.speak("hello").await, Err(SynthesisError::Failed(_))));
    }

    #[tokio::test]
    async fn test_muted_voice_is_silent_success() {
        tokio_test::assert_ok!(MutedVoice.speak("anything").await);
    }
}
