use crate::{AppResult, DebugConsole, NotifyHub, RecorderControl};

use std::time::Duration;

use song_sync_core::{Command, Intent, QueuedCommand, Storage, SyncSession};
use tokio::{
    sync::{mpsc, watch},
    time::MissedTickBehavior,
};
use tracing::{error, info, instrument, warn};

/// The host loop.
///
/// Owns the session exclusively. Transports only reach it through the command
/// channel and the shared clock, and everything slow (camera calls, export
/// delivery) happens here between ticks.
pub(crate) struct App<S: Storage, R: RecorderControl> {
    pub(crate) session: SyncSession<S>,
    pub(crate) command_rx: mpsc::Receiver<QueuedCommand>,
    pub(crate) recorder: R,
    pub(crate) hub: NotifyHub,
    pub(crate) console: DebugConsole,
    pub(crate) tick_interval: Duration,
    pub(crate) journal_file: String,
    pub(crate) export_file: String,
    pub(crate) shutdown_rx: watch::Receiver<bool>,
}

impl<S: Storage, R: RecorderControl> App<S, R> {
    /// Run iterations on a fixed period until shutdown.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Song-Sync starting");
        self.console.line("\n--- ready ---");
        self.console
            .line("Commands: digits(timeMs), m uri/title/dur, p1/p0, a<file>, b, x, r, c, g s/g e");

        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => {
                    info!("Shutdown requested");
                    break;
                }
                _ = interval.tick() => {
                    self.iterate().await;
                }
            }
        }

        info!("Song-Sync shut down");

        Ok(())
    }

    /// One loop iteration: apply queued commands, tick the scheduler, then
    /// perform pending intents oldest first. Session notices go to the
    /// console last.
    pub(crate) async fn iterate(&mut self) {
        while let Ok(queued) = self.command_rx.try_recv() {
            self.receive(queued);
        }

        self.session.tick();

        for intent in self.session.drain_intents() {
            self.perform(intent).await;
        }

        for notice in self.session.drain_notices() {
            self.console.line(&notice);
        }
    }

    fn receive(&mut self, queued: QueuedCommand) {
        let notice = match &queued {
            QueuedCommand::Apply { command, .. } => match command {
                Command::SetPlayback { playing: true } => Some("[PLAYBACK] PLAY"),
                Command::SetPlayback { playing: false } => Some("[PLAYBACK] PAUSE/STOP"),
                Command::ClearJournal => Some("events.log cleared."),
                _ => None,
            },
            QueuedCommand::Rejected { .. } => None,
        };

        self.session.receive(queued);

        if let Some(notice) = notice {
            self.console.line(notice);
        }
    }

    #[instrument(skip(self))]
    async fn perform(&mut self, intent: Intent) {
        match intent {
            Intent::StartRecorder => match self.recorder.trigger_start().await {
                Ok(()) => {
                    info!("Recorder start ok");
                    self.console.line("[camera] rec START ok");
                }
                Err(e) => {
                    warn!(error = %e, "Recorder start failed");
                    self.console.line("[camera] rec START FAIL");
                }
            },
            Intent::StopRecorder => match self.recorder.trigger_stop().await {
                Ok(()) => {
                    info!("Recorder stop ok");
                    self.console.line("[camera] rec STOP ok");
                }
                Err(e) => {
                    warn!(error = %e, "Recorder stop failed");
                    self.console.line("[camera] rec STOP FAIL");
                }
            },
            Intent::Export => {
                if let Err(e) = self.export().await {
                    error!(error = %e, "Export failed");
                    self.console.line(&format!("Export failed: {}", e));
                }
            }
            Intent::DumpJournal => {
                if let Err(e) = self.dump_journal() {
                    warn!(error = %e, "Journal unavailable");
                    self.console.line(&format!("Journal unavailable: {}", e));
                }
            }
        }
    }

    fn dump_journal(&mut self) -> AppResult<()> {
        let text = self.session.journal_text()?;
        self.console.dump(&self.journal_file, &text);
        Ok(())
    }

    /// Delivery problems fall back to the console and are not errors; only a
    /// failed timeline export is.
    async fn export(&mut self) -> AppResult<()> {
        let xml = self.session.export_timeline()?;

        if !self.hub.is_subscribed() {
            self.console.dump(&self.export_file, &xml);
            return Ok(());
        }

        match self.hub.send_chunked(xml.as_bytes()).await {
            Ok(frames) => {
                info!(frames, "Export delivered over link");
                self.console.line("[link] XML sent");
            }
            Err(e) => {
                warn!(error = %e, "Export delivery failed, printing instead");
                self.console.dump(&self.export_file, &xml);
            }
        }

        Ok(())
    }
}
