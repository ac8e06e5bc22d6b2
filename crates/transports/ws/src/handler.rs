//! Per-connection WebSocket handler
//!
//! One handler task per session: registers the session, wires its outbound
//! channel into the peer map, then processes inbound events sequentially so
//! a single sender's frames are relayed in arrival order. Frames from
//! different senders interleave freely because every connection runs its own
//! handler task.

use crate::broadcast::PeerMap;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use streamlens_core::{Broadcaster, ClientEvent, Relay, ServerEvent, SessionId, SessionRegistry};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Message, Result as WsResult},
};
use tracing::{debug, info, warn};

/// State shared across all connections
pub struct SharedState {
    pub registry: Arc<SessionRegistry>,
    pub peers: PeerMap,
    pub relay: Arc<Relay>,
}

impl SharedState {
    pub fn new(registry: Arc<SessionRegistry>, peers: PeerMap, relay: Arc<Relay>) -> Self {
        Self {
            registry,
            peers,
            relay,
        }
    }
}

/// Handle a single WebSocket connection for its whole lifetime.
///
/// Transport errors end only this session; the registry and peer map are
/// cleaned up on every exit path, and the departure is broadcast to the
/// remaining sessions.
pub async fn handle_connection(stream: TcpStream, state: Arc<SharedState>) -> WsResult<()> {
    let addr = stream.peer_addr()?;
    let ws_stream = accept_async(stream).await?;
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // Outbound channel: broadcasts and replies funnel through here so the
    // write half stays owned by one task
    let (tx, mut rx) = mpsc::channel::<Message>(128);
    let forward_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    let session_id = state.registry.register();
    state.peers.insert(session_id, tx.clone()).await;
    info!(%session_id, %addr, sessions = state.registry.len(), "session connected");
    state
        .peers
        .publish(ServerEvent::SessionConnected { session_id }, None)
        .await;

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => dispatch(&text, session_id, &state).await,
            Ok(Message::Ping(data)) => {
                let _ = tx.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => {
                debug!(%session_id, "close frame received");
                break;
            }
            Ok(_) => debug!(%session_id, "ignoring non-text message"),
            Err(e) => {
                warn!(%session_id, error = %e, "connection error");
                break;
            }
        }
    }

    // Remove before notifying so the departing peer misses its own farewell
    state.peers.remove(session_id).await;
    state.registry.unregister(session_id);
    state
        .peers
        .publish(ServerEvent::SessionDisconnected { session_id }, None)
        .await;
    info!(%session_id, sessions = state.registry.len(), "session disconnected");

    forward_task.abort();
    Ok(())
}

/// Route one inbound event to the relay engine.
///
/// Unparseable messages are logged and dropped; the sender is not notified
/// (fire-and-forget protocol).
async fn dispatch(text: &str, session_id: SessionId, state: &Arc<SharedState>) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::ModeChange { enabled }) => {
            state.relay.on_mode_change(session_id, enabled).await;
        }
        Ok(ClientEvent::Frame { data }) => {
            state.relay.on_frame(session_id, data).await;
        }
        Ok(ClientEvent::DetectFrame { data }) => {
            state.relay.on_detect_request(session_id, data).await;
        }
        Err(e) => {
            warn!(%session_id, error = %e, "dropping malformed message");
        }
    }
}
