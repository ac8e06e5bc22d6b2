//! WebSocket event transport for the Streamlens frame relay.
//!
//! Carries the relay's event protocol over one persistent WebSocket per
//! session: tagged JSON envelopes in text frames, frame bytes base64-encoded
//! inside them. Each connection gets a session id, an outbound channel into
//! the shared [`PeerMap`], and a read loop that feeds the relay engine;
//! the `PeerMap` is the [`streamlens_core::Broadcaster`] implementation.

mod broadcast;
mod handler;
mod server;

pub use broadcast::PeerMap;
pub use handler::{handle_connection, SharedState};
pub use server::{RelayServer, RelayServerHandle};
