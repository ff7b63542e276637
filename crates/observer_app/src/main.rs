//! Terminal client for observing a collaborative snippet worker.
//!
//! Usage: `observer_app [config.ron]`

mod commands;
mod config;
mod coordinator;
mod editor;
mod effects;
mod render;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use log::LevelFilter;
use observer_engine::{ChannelEventSink, EngineHandle, ReqwestWorkerClient};
use observer_logging::{observer_info, observer_warn};
use tokio::sync::mpsc;

use config::{ObserverConfig, DEFAULT_CONFIG_FILE};
use coordinator::Coordinator;
use render::TerminalRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = ObserverConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {config_path:?}"))?;

    observer_logging::initialize(
        config.log_destination,
        LevelFilter::Info,
        &observer_logging::log_path_or_default(config.log_file.as_deref()),
    );
    observer_info!(
        "Starting observer server={} worker={} poll={}ms",
        config.server_url,
        config.worker_url,
        config.poll_interval_ms
    );

    let client = ReqwestWorkerClient::new(config.client_settings())
        .context("building HTTP client")?;
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = EngineHandle::start(
        Arc::new(client),
        config.poll_settings(),
        Arc::new(ChannelEventSink::new(event_tx)),
    );

    // Stdin is read on a plain thread so a pending read never holds up shutdown.
    let (line_tx, line_rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    observer_warn!("Reading stdin failed: {}", err);
                    break;
                }
            }
        }
    });

    println!("{}", commands::HELP);
    let coordinator = Coordinator::new(TerminalRenderer::new(std::io::stdout()), engine);
    let coordinator = coordinator.run(line_rx, event_rx).await;

    coordinator.dispatcher().shutdown().await;
    observer_info!("Observer stopped");
    Ok(())
}
