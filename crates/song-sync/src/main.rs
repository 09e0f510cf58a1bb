//! Song-Sync: keeps camera clip recording in step with the song playing on a
//! paired phone.

mod app;
mod camera;
mod config;
mod error;
mod link;
mod serial;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    camera::{CameraClient, RecorderControl},
    error::{AppError, Result as AppResult},
    link::NotifyHub,
    serial::{DebugConsole, SerialReader},
};

use crate::config::Config;

use std::{sync::Arc, time::Duration};

use song_sync_core::{Dispatcher, EventJournal, FsStorage, SongClock, SyncSession};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "song_sync=debug,song_sync_core=debug";

/// Application entry point.
fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Stdout is the debug channel; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(config)) {
        error!(error = ?e, "Song-Sync failed");
        std::process::exit(1);
    }

    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_timeout(Duration::from_secs(1));
}

async fn run(config: Config) -> AppResult<()> {
    let storage = FsStorage::new(&config.storage.data_dir);
    match storage.mount() {
        Ok(()) => info!(root = ?storage.root(), "Journal storage mounted"),
        Err(e) => error!(
            root = ?storage.root(),
            error = %e,
            "Storage mount failed, events will not be journaled"
        ),
    }

    let clock = Arc::new(SongClock::new());
    let (command_tx, command_rx) = mpsc::channel(config.link.command_queue_depth);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let dispatcher = Dispatcher::new(Arc::clone(&clock), command_tx)
        .with_max_write_len(config.link.max_write_len);
    let journal = EventJournal::new(storage, config.storage.journal_file.clone());
    let hub = NotifyHub::new(config.chunk_size(), config.pacing());

    let app = App {
        session: SyncSession::new(clock, journal, config.session_options()),
        command_rx,
        recorder: CameraClient::new(&config.camera)?,
        hub: hub.clone(),
        console: DebugConsole::stdout(),
        tick_interval: config.tick_interval(),
        journal_file: config.storage.journal_file.clone(),
        export_file: config.storage.export_file.clone(),
        shutdown_rx: shutdown_rx.clone(),
    };
    let serial = SerialReader::new(dispatcher.clone());

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            // Dropping the sender would read as a shutdown.
            std::future::pending::<()>().await;
        }
        info!("Ctrl-C received");
        let _ = shutdown_tx.send(true);
    });

    tokio::join!(
        async {
            if let Err(e) = link::serve(&config.link, dispatcher, hub, shutdown_rx.clone()).await {
                error!(error = ?e, "Link error");
            }
        },
        async {
            if let Err(e) = serial.run(tokio::io::stdin(), shutdown_rx.clone()).await {
                error!(error = ?e, "Serial reader error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );

    Ok(())
}
