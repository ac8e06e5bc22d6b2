//! Relay server binary entry point
//!
//! Starts the Streamlens WebSocket relay for live frame streaming with
//! detection gating.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (0.0.0.0:8080, target label "car", 10% area gate)
//! cargo run -p streamlens-relay-server
//!
//! # Custom address and gate sensitivity
//! cargo run -p streamlens-relay-server -- \
//!   --listen-address 127.0.0.1:9000 \
//!   --target-label person \
//!   --min-area-fraction 0.05
//!
//! # With logging
//! RUST_LOG=debug cargo run -p streamlens-relay-server
//! ```

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use streamlens_core::{
    DetectionGate, GateConfig, ImageCodec, Relay, SessionRegistry, StubDetector,
};
use streamlens_ws::{PeerMap, RelayServer, SharedState};
use tracing::info;

/// Streamlens relay server
///
/// Relays a live video stream between connected sessions, optionally
/// annotating each frame with a size-gated detection verdict.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on for WebSocket connections
    #[arg(long, default_value = "0.0.0.0:8080", env = "STREAMLENS_LISTEN_ADDR")]
    listen_address: SocketAddr,

    /// Class label that counts as the object of interest
    #[arg(long, default_value = "car", env = "STREAMLENS_TARGET_LABEL")]
    target_label: String,

    /// Minimum box area as a fraction of frame area, in (0, 1]
    #[arg(long, default_value_t = 0.1, env = "STREAMLENS_MIN_AREA_FRACTION")]
    min_area_fraction: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_address = %args.listen_address,
        target_label = %args.target_label,
        min_area_fraction = args.min_area_fraction,
        "Streamlens relay server starting"
    );

    let gate = DetectionGate::new(GateConfig {
        target_label: args.target_label,
        min_area_fraction: args.min_area_fraction,
    })
    .context("invalid gate configuration")?;

    let registry = Arc::new(SessionRegistry::new());
    let peers = PeerMap::new();
    // The detector is a pluggable collaborator; the stub reports nothing
    // until a model backend is wired in.
    let relay = Arc::new(Relay::new(
        gate,
        Arc::new(ImageCodec::new()),
        Arc::new(StubDetector::new()),
        Arc::new(peers.clone()),
    ));
    let state = Arc::new(SharedState::new(registry, peers, relay));

    let handle = RelayServer::bind(args.listen_address, state)
        .await
        .context("failed to bind listen address")?
        .start();

    info!("relay server ready - waiting for sessions");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("shutdown signal received");

    handle.shutdown().await;
    info!("relay server shutdown complete");
    Ok(())
}
