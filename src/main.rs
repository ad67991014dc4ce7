//! Casefile Engine harness
//!
//! Drives one investigation over newline-delimited JSON:
//! - Host messages are read from stdin
//! - Module messages (results, snapshots, aspect requests) go to stdout
//! - Logs go to stderr

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use casefile_engine::application::ports::outbound::RoomCatalogPort;
use casefile_engine::application::services::InvestigationService;
use casefile_engine::infrastructure::clock::SystemClock;
use casefile_engine::infrastructure::config::AppConfig;
use casefile_engine::infrastructure::messages::ModuleMessage;
use casefile_engine::infrastructure::room_catalog::InMemoryRoomCatalog;
use casefile_engine::infrastructure::runtime::{RuntimeEvent, SessionRuntime};
use casefile_engine::infrastructure::stdio_bridge::{
    pump_host_messages, spawn_writer, StdioHostBridge,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Initialize logging; stdout is reserved for the host channel
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Casefile Engine");
    tracing::info!("  Tick interval: {:?}", config.tick_interval());
    tracing::info!("  Hint duration: {:?}", config.hint_duration());

    let catalog = match &config.rooms_file {
        Some(path) => InMemoryRoomCatalog::from_file(path)
            .with_context(|| format!("Failed to load rooms from {}", path.display()))?,
        None => InMemoryRoomCatalog::builtin().context("Built-in room catalog is invalid")?,
    };
    tracing::info!("Room catalog loaded: {:?}", catalog.room_ids());

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let writer = spawn_writer(tokio::io::stdout(), outbound_rx);
    let bridge = StdioHostBridge::new(outbound_tx);

    let service = InvestigationService::new(
        Arc::new(catalog),
        Arc::new(bridge.clone()),
        Arc::new(SystemClock::new()),
    );
    let (runtime, handle) =
        SessionRuntime::new(service, config.tick_interval(), config.hint_duration());
    let mut runtime_task = tokio::spawn(runtime.run());

    if let Some(module_config) = config.read_module_config()? {
        tracing::info!("Using module configuration from {:?}", config.module_config);
        handle.send(RuntimeEvent::Configure(Box::new(module_config)))?;
    }

    bridge.send(ModuleMessage::Ready)?;
    let reader = tokio::spawn(pump_host_messages(
        BufReader::new(tokio::io::stdin()),
        handle,
        bridge,
    ));

    let outcome = tokio::select! {
        joined = &mut runtime_task => joined.context("Session runtime panicked")?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping runtime...");
            runtime_task.abort();
            Ok(())
        }
    };
    reader.abort();

    // Let queued module messages reach the host before exiting
    if tokio::time::timeout(Duration::from_secs(1), writer).await.is_err() {
        tracing::warn!("Timed out flushing module output");
    }

    outcome.context("Investigation ended without delivering its result")?;
    tracing::info!("Casefile Engine stopped");
    Ok(())
}
