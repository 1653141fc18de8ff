//! Hotline: answer telephone keypads on one side, play a game on the other.
//!
//! Runs the inbound HTTP gateway for the telephony provider's voice
//! callbacks and relays caller joins/moves to the game server over
//! per-caller WebSocket connections.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hotline_relay::WsConnector;
use hotline_server::{HotlineServer, metrics};
use hotline_session::{SessionRegistry, TurnProcessor};
use hotline_settings::{HotlineSettings, get_settings, init_settings, load_settings_from_path};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "hotline", about = "Telephone keypad to game server bridge")]
struct Args {
    /// Port for the provider-callback HTTP server (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Game server base WebSocket URL (overrides settings).
    #[arg(long)]
    game_server_url: Option<String>,

    /// Path to a settings file (default: ~/.hotline/settings.json).
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Settings pick the default log filter, so they load before the
    // subscriber exists; the outcome is reported right after init so a
    // missing or malformed --settings file is never silently swallowed.
    let mut load_error = None;
    if let Some(path) = &args.settings {
        match load_settings_from_path(path) {
            Ok(settings) => init_settings(settings),
            Err(e) => {
                load_error = Some(e);
                init_settings(HotlineSettings::default());
            }
        }
    }
    let settings = get_settings();

    // HOTLINE_LOG beats RUST_LOG beats the configured level.
    let filter = tracing_subscriber::EnvFilter::try_from_env("HOTLINE_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(path) = &args.settings {
        match &load_error {
            Some(e) => {
                warn!(path = %path.display(), error = %e, "failed to load settings, using defaults");
            }
            None => info!(path = %path.display(), "settings loaded"),
        }
    }

    let metrics_handle = metrics::install_recorder();

    let port = args.port.unwrap_or(settings.server.http_port);
    let game_server_url = args
        .game_server_url
        .clone()
        .unwrap_or_else(|| settings.relay.game_server_url.clone());

    let registry = Arc::new(SessionRegistry::new());
    let connector = WsConnector::new(
        &game_server_url,
        Duration::from_millis(settings.relay.connect_timeout_ms),
    );
    let processor = Arc::new(TurnProcessor::new(
        Arc::clone(&registry),
        Arc::new(connector),
    ));

    let reaper = settings.session.max_idle_secs.map(|max_idle| {
        registry.start_reaper(
            Duration::from_secs(max_idle),
            Duration::from_secs(settings.session.sweep_interval_secs),
        )
    });

    let server = HotlineServer::new(processor, metrics_handle);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;

    info!(port, game_server = %game_server_url, "waiting for incoming calls");

    axum::serve(listener, server.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(reaper) = reaper {
        reaper.cancel();
    }
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl+c");
        return;
    }
    info!("shutdown signal received");
}
