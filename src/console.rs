//! Terminal front door
//!
//! Reads one line per interaction. Plain text is a typed command; lines
//! starting with `:` are console actions (voice capture, notes, status).

use std::io::BufRead;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::assistant::{Assistant, Reply};
use crate::state::Session;

const HELP: &str = "\
Type a command (\"open youtube\", \"who is ada lovelace\", \"what time is it\", \"take a note\"),
or one of:
  :listen   capture a voice command (resumes listening)
  :notes    show saved notes
  :status   show session state
  :help     show this help
  :quit     exit";

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Blank,
    Listen,
    Notes,
    Status,
    Help,
    Quit,
    /// Typed command text, passed through unmodified
    Say(String),
    /// Unknown `:` action
    Unknown(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ConsoleCommand::Blank;
        }
        let Some(action) = trimmed.strip_prefix(':') else {
            return ConsoleCommand::Say(line.trim_end_matches(['\r', '\n']).to_string());
        };
        match action.trim() {
            "listen" | "l" => ConsoleCommand::Listen,
            "notes" | "n" => ConsoleCommand::Notes,
            "status" | "s" => ConsoleCommand::Status,
            "help" | "h" | "?" => ConsoleCommand::Help,
            "quit" | "q" => ConsoleCommand::Quit,
            other => ConsoleCommand::Unknown(other.to_string()),
        }
    }
}

/// Why the console stopped reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleExit {
    /// `:quit` was entered
    Quit,
    /// Input closed (EOF or detached terminal)
    EndOfInput,
}

/// Read stdin lines on a dedicated thread
///
/// Blocking reads stay off the runtime so shutdown never waits on the
/// terminal. The channel closes at end of input.
pub fn spawn_stdin_reader() -> Result<mpsc::Receiver<String>> {
    let (line_tx, line_rx) = mpsc::channel(16);

    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(?e, "failed to read console input");
                        break;
                    }
                }
            }
            info!("console input closed");
        })
        .context("failed to spawn console input thread")?;

    Ok(line_rx)
}

/// Run the console until `:quit` or end of input
pub async fn run<W>(
    assistant: Arc<Assistant>,
    session: Arc<Mutex<Session>>,
    mut lines: mpsc::Receiver<String>,
    mut output: W,
) -> Result<ConsoleExit>
where
    W: AsyncWrite + Unpin,
{
    write_line(&mut output, HELP).await?;

    while let Some(line) = lines.recv().await {
        let command = ConsoleCommand::parse(&line);
        debug!(?command, "console input");

        match command {
            ConsoleCommand::Blank => continue,
            ConsoleCommand::Quit => return Ok(ConsoleExit::Quit),
            ConsoleCommand::Help => write_line(&mut output, HELP).await?,
            ConsoleCommand::Unknown(action) => {
                write_line(&mut output, &format!("unknown action :{action} (try :help)")).await?
            }
            ConsoleCommand::Status => {
                let session = session.lock().await;
                let pending = if session.pending_note() {
                    ", waiting for a note"
                } else {
                    ""
                };
                write_line(&mut output, &format!("state: {}{}", session.state(), pending)).await?;
            }
            ConsoleCommand::Listen => {
                let mut session = session.lock().await;
                write_line(&mut output, "Listening...").await?;
                let reply = assistant.handle_voice(&mut session).await;
                show(&mut output, &reply).await?;
            }
            ConsoleCommand::Notes => {
                let mut session = session.lock().await;
                let reply = assistant.show_notes(&mut session).await;
                show(&mut output, &reply).await?;
            }
            ConsoleCommand::Say(text) => {
                let mut session = session.lock().await;
                let reply = assistant.handle_typed(&mut session, &text).await;
                show(&mut output, &reply).await?;
            }
        }
    }

    Ok(ConsoleExit::EndOfInput)
}

/// Settle the console's exit for the process
///
/// End of input only closes the console while the IPC socket is serving;
/// the process then runs until a shutdown signal.
pub async fn hold_open(exit: ConsoleExit, ipc_serving: bool) -> ConsoleExit {
    if exit == ConsoleExit::EndOfInput && ipc_serving {
        info!("console input closed, IPC keeps serving until shutdown");
        std::future::pending::<()>().await;
    }
    exit
}

async fn show<W: AsyncWrite + Unpin>(output: &mut W, reply: &Reply) -> Result<()> {
    write_line(output, &reply.text).await
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
