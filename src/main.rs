//! voice-command-assistant: keyword-driven voice and text command assistant
//!
//! Runs an interactive terminal session and, optionally, an IPC socket so a
//! separate UI can drive the same session:
//! - Text normalization and ordered keyword intent matching
//! - Canned replies, Wikipedia summaries, browser hand-off, clock, notes
//! - Spoken replies while listening; a stop command pauses speech until
//!   the next voice capture
//!
//! Speech recognition, speech synthesis and lookups are external services.

mod assistant;
mod config;
mod console;
mod events;
mod intent;
mod ipc;
mod lifecycle;
mod notes;
mod services;
mod state;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::Result;
use chrono::Timelike;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::assistant::{greeting_for_hour, Assistant};
use crate::config::Config;
use crate::events::SessionEvent;
use crate::ipc::Server;
use crate::lifecycle::ShutdownSignal;
use crate::state::Session;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the console
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "voice-command-assistant starting"
    );

    // Load configuration
    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(ipc = config.ipc_enabled, speech = config.speech_enabled, "configuration loaded");

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();

    // Session -> loggers and subscribed IPC clients
    let (event_tx, _event_rx) = broadcast::channel::<SessionEvent>(64);

    let assistant = Arc::new(Assistant::from_config(&config)?);
    let session = Arc::new(Mutex::new(Session::new(event_tx.clone())));

    let server = if config.ipc_enabled {
        Some(Server::new(
            &config.socket_path,
            assistant.clone(),
            session.clone(),
            event_tx.clone(),
        )?)
    } else {
        None
    };

    let mut log_rx = event_tx.subscribe();
    let console_input = console::spawn_stdin_reader()?;

    println!("{}", greeting_for_hour(assistant.clock().now().hour()));

    info!(notes = ?assistant.notes().path(), "assistant initialized, entering main loop");

    tokio::select! {
        // Terminal session; end of input leaves IPC clients connected
        result = async {
            let exit = console::run(
                assistant.clone(),
                session.clone(),
                console_input,
                tokio::io::stdout(),
            )
            .await?;
            Ok::<_, anyhow::Error>(console::hold_open(exit, server.is_some()).await)
        } => {
            match result {
                Ok(exit) => info!(?exit, "console closed"),
                Err(e) => error!(?e, "console error"),
            }
        }

        // IPC server, when enabled
        result = async {
            match &server {
                Some(server) => server.run().await,
                None => std::future::pending().await,
            }
        } => {
            if let Err(e) = result {
                error!(?e, "IPC server error");
            }
        }

        // Session event log
        _ = async {
            loop {
                match log_rx.recv().await {
                    Ok(event) => info!(%event, "session event"),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "session event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        } => {
            info!("session event handler exited");
        }

        // Wait for shutdown signal
        _ = async {
            match shutdown.wait().await {
                Ok(reason) => info!(?reason, "shutdown signal received"),
                Err(e) => {
                    error!(?e, "failed to register signal handlers");
                    std::future::pending::<()>().await;
                }
            }
        } => {}
    }

    // Cleanup
    info!("shutting down...");

    if let Some(server) = &server {
        server.shutdown().await;
    }

    info!("voice-command-assistant stopped");

    Ok(())
}
