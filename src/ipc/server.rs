//! Unix domain socket server for IPC
//!
//! Provides request-response access to the shared session and pushes
//! session events to subscribed clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::assistant::Assistant;
use crate::events::SessionEvent;
use crate::state::Session;

use super::protocol::{AssistantStatus, Request, Response, MAX_MESSAGE_LEN};

/// IPC Server handling client connections
pub struct Server {
    socket_path: PathBuf,
    listener: Option<UnixListener>,
    shared: Shared,
    shutdown_tx: broadcast::Sender<()>,
}

/// State shared with every client handler
#[derive(Clone)]
struct Shared {
    assistant: Arc<Assistant>,
    /// Held for a whole interaction so interactions never overlap
    session: Arc<Mutex<Session>>,
    events: broadcast::Sender<SessionEvent>,
    start_time: Instant,
}

impl Server {
    /// Create a new IPC server bound to `socket_path`
    pub fn new(
        socket_path: &Path,
        assistant: Arc<Assistant>,
        session: Arc<Mutex<Session>>,
        events: broadcast::Sender<SessionEvent>,
    ) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .context("failed to create socket directory")?;
        }

        // Remove stale socket if it exists
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .context("failed to remove stale socket")?;
        }

        let listener = UnixListener::bind(socket_path)
            .context("failed to bind Unix socket")?;

        // Set socket permissions to owner-only (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        info!(?socket_path, "IPC server listening");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener: Some(listener),
            shared: Shared {
                assistant,
                session,
                events,
                start_time: Instant::now(),
            },
            shutdown_tx,
        })
    }

    /// Run the server, accepting connections
    pub async fn run(&self) -> Result<()> {
        let listener = self.listener.as_ref()
            .context("server not initialized")?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("client connected");
                    let shared = self.shared.clone();
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = Self::handle_client(stream, shared) => {
                                if let Err(e) = result {
                                    warn!(?e, "client handler error");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("client handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "accept error");
                }
            }
        }
    }

    /// Handle a single client connection
    async fn handle_client(stream: UnixStream, shared: Shared) -> Result<()> {
        let (mut reader, writer) = stream.into_split();
        let (out_tx, out_rx) = mpsc::channel::<Response>(32);
        let writer_task = tokio::spawn(Self::write_loop(writer, out_rx));
        let mut forwarder: Option<tokio::task::JoinHandle<()>> = None;

        let result = loop {
            let msg_buf = match read_message(&mut reader).await {
                Ok(Some(buf)) => buf,
                Ok(None) => {
                    debug!("client disconnected");
                    break Ok(());
                }
                Err(e) => break Err(e),
            };

            let response = match serde_json::from_slice::<Request>(&msg_buf) {
                Ok(request) => {
                    debug!(?request, "received request");
                    if matches!(request, Request::Subscribe) && forwarder.is_none() {
                        debug!("client subscribed to notifications");
                        forwarder = Some(tokio::spawn(Self::forward_events(
                            shared.events.subscribe(),
                            out_tx.clone(),
                        )));
                    }
                    Self::process_request(request, &shared).await
                }
                Err(e) => {
                    warn!(?e, "malformed request");
                    Response::error("bad_request", e.to_string())
                }
            };

            if out_tx.send(response).await.is_err() {
                break Ok(());
            }
        };

        if let Some(forwarder) = forwarder {
            forwarder.abort();
        }
        drop(out_tx);
        let _ = writer_task.await;
        result
    }

    /// Serialize queued responses onto the socket
    async fn write_loop(
        mut writer: tokio::net::unix::OwnedWriteHalf,
        mut out_rx: mpsc::Receiver<Response>,
    ) {
        while let Some(response) = out_rx.recv().await {
            if let Err(e) = write_message(&mut writer, &response).await {
                warn!(?e, "failed to write response");
                break;
            }
        }
    }

    /// Push session events to a subscribed client until it goes away
    async fn forward_events(
        mut event_rx: broadcast::Receiver<SessionEvent>,
        out_tx: mpsc::Sender<Response>,
    ) {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    if out_tx.send(Response::Event { event }).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "subscriber lagged behind session events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Process a request and return a response
    async fn process_request(request: Request, shared: &Shared) -> Response {
        match request {
            Request::Ping => Response::Pong,

            Request::GetStatus => {
                let session = shared.session.lock().await;
                Response::Status(AssistantStatus {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    state: session.state(),
                    pending_note: session.pending_note(),
                    uptime_secs: shared.start_time.elapsed().as_secs(),
                })
            }

            Request::Command { text } => {
                let mut session = shared.session.lock().await;
                let reply = shared.assistant.handle_typed(&mut session, &text).await;
                Response::reply(reply, session.state())
            }

            Request::Capture => {
                let mut session = shared.session.lock().await;
                let reply = shared.assistant.handle_voice(&mut session).await;
                Response::reply(reply, session.state())
            }

            Request::SaveNote { body } => {
                let mut session = shared.session.lock().await;
                let reply = shared.assistant.save_note(&mut session, &body).await;
                Response::reply(reply, session.state())
            }

            Request::ReadNotes => {
                let mut session = shared.session.lock().await;
                let reply = shared.assistant.show_notes(&mut session).await;
                Response::reply(reply, session.state())
            }

            Request::Subscribe => Response::Subscribed,
        }
    }

    /// Gracefully shutdown the server
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        // Remove socket file
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove socket file");
            }
        }

        info!("IPC server shutdown complete");
    }
}

/// Read one length-prefixed message; `None` on clean disconnect
async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_LEN {
        warn!(len, "message too large, disconnecting");
        return Ok(None);
    }

    let mut msg_buf = vec![0u8; len];
    reader.read_exact(&mut msg_buf).await?;
    Ok(Some(msg_buf))
}

/// Send a length-prefixed JSON message
async fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let msg_bytes = serde_json::to_vec(msg)?;
    let msg_len = (msg_bytes.len() as u32).to_le_bytes();

    writer.write_all(&msg_len).await?;
    writer.write_all(&msg_bytes).await?;
    writer.flush().await?;

    Ok(())
}
