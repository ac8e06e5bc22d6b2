//! Best-effort broadcast over the connected peer set

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use streamlens_core::{Broadcaster, ServerEvent, SessionId};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error};

/// Shared map from session id to that connection's outbound channel.
///
/// Publishing snapshots the senders under the read lock, then delivers
/// outside it. A peer that disconnects between snapshot and delivery simply
/// misses the message; the publisher never sees an error.
#[derive(Clone, Default)]
pub struct PeerMap {
    inner: Arc<RwLock<HashMap<SessionId, mpsc::Sender<Message>>>>,
}

impl PeerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: SessionId, tx: mpsc::Sender<Message>) {
        self.inner.write().await.insert(id, tx);
    }

    pub async fn remove(&self, id: SessionId) {
        self.inner.write().await.remove(&id);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    fn encode(event: &ServerEvent) -> Option<Message> {
        match serde_json::to_string(event) {
            Ok(json) => Some(Message::Text(json)),
            Err(e) => {
                error!(error = %e, "failed to serialize outbound event");
                None
            }
        }
    }
}

#[async_trait]
impl Broadcaster for PeerMap {
    async fn publish(&self, event: ServerEvent, exclude: Option<SessionId>) {
        let Some(msg) = Self::encode(&event) else {
            return;
        };

        let targets: Vec<(SessionId, mpsc::Sender<Message>)> = {
            let peers = self.inner.read().await;
            peers
                .iter()
                .filter(|(id, _)| Some(**id) != exclude)
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        for (id, tx) in targets {
            if tx.send(msg.clone()).await.is_err() {
                debug!(%id, "peer disconnected during broadcast");
            }
        }
    }

    async fn publish_to(&self, target: SessionId, event: ServerEvent) {
        let Some(msg) = Self::encode(&event) else {
            return;
        };

        let tx = self.inner.read().await.get(&target).cloned();
        match tx {
            Some(tx) => {
                if tx.send(msg).await.is_err() {
                    debug!(%target, "target disconnected during delivery");
                }
            }
            None => debug!(%target, "target no longer connected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> ServerEvent {
        ServerEvent::ModeChanged { enabled: true }
    }

    #[tokio::test]
    async fn test_publish_reaches_every_peer() {
        let peers = PeerMap::new();
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        let a = SessionId::new();
        let b = SessionId::new();
        peers.insert(a, tx_a).await;
        peers.insert(b, tx_b).await;

        peers.publish(event(), None).await;

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_publish_honors_exclusion() {
        let peers = PeerMap::new();
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        let a = SessionId::new();
        let b = SessionId::new();
        peers.insert(a, tx_a).await;
        peers.insert(b, tx_b).await;

        peers.publish(event(), Some(a)).await;

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_publish_survives_vanished_peer() {
        let peers = PeerMap::new();
        let (tx_a, rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        peers.insert(SessionId::new(), tx_a).await;
        peers.insert(SessionId::new(), tx_b).await;

        // Receiver dropped mid-flight: delivery to it silently fails
        drop(rx_a);
        peers.publish(event(), None).await;

        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_publish_to_unknown_target_is_a_noop() {
        let peers = PeerMap::new();
        peers.publish_to(SessionId::new(), event()).await;
    }
}
