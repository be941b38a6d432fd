// blipdesk - headless control panel for host-managed map markers
//
// Architecture:
// - Host side: newline-delimited JSON envelopes on stdin, calls on stdout
// - Panel: single owner of marker state, driven by host events and operator actions
// - Bridge: one tokio task selecting over input, the search debounce and shutdown
// - Demo: scripted host session fed into the same input channel

mod cli;

use anyhow::Result;
use blipdesk::bridge::{self, Inbound};
use blipdesk::config::Config;
use blipdesk::export::ExportWriter;
use blipdesk::panel::{HostBridge, Panel, PanelSettings};
use blipdesk::{demo, logging};
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::{mpsc, oneshot};

/// Inbound lines that may queue before readers wait
const INBOUND_BUFFER: usize = 64;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Config subcommands exit early
    if cli::handle_cli(&cli)? {
        return Ok(());
    }

    // Write the template on first run (helps users discover options)
    if let Err(e) = Config::ensure_config_exists() {
        eprintln!("Warning: could not write default config: {:#}", e);
    }

    let config = Config::load()?;

    // Guard must outlive the runtime so buffered file logs flush
    let _file_guard = logging::init_tracing(&config.logging)?;

    tracing::info!("blipdesk {} starting", blipdesk::config::VERSION);
    tracing::debug!("Export directory: {}", config.export.dir.display());

    let (host, calls) = HostBridge::channel(config.panel.host_call_buffer);
    let panel = Panel::new(
        PanelSettings::from_config(&config),
        host,
        ExportWriter::new(&config.export.dir),
    );

    let (inbound_tx, inbound_rx) = mpsc::channel::<Inbound>(INBOUND_BUFFER);
    let (loop_shutdown_tx, loop_shutdown_rx) = oneshot::channel();
    let (demo_shutdown_tx, demo_shutdown_rx) = oneshot::channel();

    let demo_task = if cli.demo || config.features.demo {
        tracing::info!("Running in DEMO MODE - replaying a scripted host session");
        Some(tokio::spawn(demo::run_demo(
            inbound_tx.clone(),
            demo_shutdown_rx,
        )))
    } else {
        None
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let reader = tokio::spawn(async move {
        if let Err(e) = bridge::read_lines(stdin, inbound_tx).await {
            tracing::error!("Input reader stopped: {:#}", e);
        }
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = loop_shutdown_tx.send(());
            let _ = demo_shutdown_tx.send(());
        }
    });

    let mut stdout = tokio::io::stdout();
    bridge::run(panel, calls, inbound_rx, &mut stdout, loop_shutdown_rx).await?;

    tracing::info!("Shutting down...");
    reader.abort();
    if let Some(task) = demo_task {
        task.abort();
    }
    tracing::info!("Shutdown complete");
    Ok(())
}
