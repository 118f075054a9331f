//! Signal handling for graceful shutdown

use std::io;

use tokio::signal::unix::{signal, SignalKind};
use tracing::debug;

/// Which signal ended the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Terminate,
    Interrupt,
}

/// Handles shutdown signals (SIGTERM, SIGINT)
#[derive(Debug, Default)]
pub struct ShutdownSignal;

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal
    pub async fn wait(&self) -> io::Result<ShutdownReason> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        let reason = tokio::select! {
            _ = sigterm.recv() => ShutdownReason::Terminate,
            _ = sigint.recv() => ShutdownReason::Interrupt,
        };
        debug!(?reason, "shutdown signal received");
        Ok(reason)
    }
}
