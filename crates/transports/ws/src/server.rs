//! WebSocket relay server
//!
//! Binds the listen address, then accepts connections in a loop and spawns
//! one handler task per connection. The returned handle carries the bound
//! address (useful with port 0) and a shutdown channel.

use crate::handler::{handle_connection, SharedState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Accept-loop server for the relay's WebSocket transport
pub struct RelayServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: Arc<SharedState>,
}

impl RelayServer {
    /// Bind the listen address.
    ///
    /// A bind failure is the one unrecoverable startup error: callers are
    /// expected to terminate the process on it.
    pub async fn bind(addr: SocketAddr, state: Arc<SharedState>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("relay server listening on ws://{}", local_addr);
        Ok(Self {
            listener,
            local_addr,
            state,
        })
    }

    /// Address the server actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start the accept loop on the current runtime
    pub fn start(self) -> RelayServerHandle {
        let RelayServer {
            listener,
            local_addr,
            state,
        } = self;

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => match result {
                        Ok((stream, peer_addr)) => {
                            debug!(%peer_addr, "accepted tcp connection");
                            let state = Arc::clone(&state);
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, state).await {
                                    warn!(%peer_addr, error = %e, "connection ended with error");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "failed to accept connection");
                        }
                    },
                    _ = shutdown_rx.recv() => {
                        info!("relay server received shutdown signal");
                        break;
                    }
                }
            }
        });

        RelayServerHandle {
            local_addr,
            shutdown_tx,
            task,
        }
    }
}

/// Handle for a running relay server
pub struct RelayServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl RelayServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    /// Established connections wind down on their own as clients disconnect.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}
