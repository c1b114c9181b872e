//! # TCP Transport
//!
//! Listen and dial. The transport owns nothing about peers: every
//! connection it produces — accepted or dialed — is handed over as a raw
//! `TcpStream` and becomes the registrar's problem.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::errors::NetworkError;

/// How long an outbound dial may take before it fails.
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(1);

/// A bound-on-demand TCP listener plus a dial helper.
pub struct TcpTransport {
    listen_addr: String,
    accept_task: Mutex<Option<JoinHandle<()>>>,
}

impl TcpTransport {
    /// A transport that will listen on `listen_addr` once started.
    ///
    /// Addresses may omit the host (`":3001"`); the listener then binds
    /// all interfaces.
    pub fn new(listen_addr: impl Into<String>) -> TcpTransport {
        TcpTransport {
            listen_addr: listen_addr.into(),
            accept_task: Mutex::new(None),
        }
    }

    /// The configured (advertised) listen address.
    pub fn addr(&self) -> &str {
        &self.listen_addr
    }

    /// Bind the listener and spawn the accept loop.
    ///
    /// Every accepted connection is pushed into `add_peer`; the loop ends
    /// when the receiving side goes away or [`close`](Self::close) aborts it.
    pub async fn listen(&self, add_peer: mpsc::Sender<TcpStream>) -> Result<(), NetworkError> {
        let bind_addr = expand_addr(&self.listen_addr, "0.0.0.0");
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(addr = %self.listen_addr, "transport started");

        let task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, remote)) => {
                        if add_peer.send(stream).await.is_err() {
                            info!(%remote, "registrar gone, stopping accept loop");
                            break;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "accepting connection failed");
                        continue;
                    }
                }
            }
        });
        *self.accept_task.lock() = Some(task);
        Ok(())
    }

    /// Connect to a remote listener, bounded by [`DIAL_TIMEOUT`].
    pub async fn dial(addr: &str) -> Result<TcpStream, NetworkError> {
        let target = expand_addr(addr, "127.0.0.1");
        let stream = tokio::time::timeout(DIAL_TIMEOUT, TcpStream::connect(&target))
            .await
            .map_err(|_| NetworkError::DialTimeout {
                addr: addr.to_string(),
            })??;
        Ok(stream)
    }

    /// Stop the accept loop. Established peers are not touched here; the
    /// registrar tears those down by walking its registry.
    pub fn close(&self) {
        if let Some(task) = self.accept_task.lock().take() {
            task.abort();
            info!(addr = %self.listen_addr, "closing transport");
        }
    }
}

/// Fill in the host for `":port"`-style addresses.
fn expand_addr(addr: &str, host: &str) -> String {
    if let Some(port) = addr.strip_prefix(':') {
        format!("{host}:{port}")
    } else {
        addr.to_string()
    }
}
