//! The synchronization context owned by the host loop.
//!
//! Field ownership:
//! - `clock` is shared. Transport contexts write it through a
//!   [`Dispatcher`](crate::Dispatcher); this type only reads it.
//! - Everything else is written only here, from commands the dispatcher queued,
//!   so metadata is committed whole and never observed half-updated.

use crate::{
    AutoRecordScheduler, BoundaryKind, ClipBoundary, Command, CoreResult, EventJournal,
    JournalEntry, MetadataStore, QueuedCommand, RecorderAction, SchedulerPhase,
    SchedulerThresholds, SongClock, SongMetadata, Storage, TickInput, Timeline,
    session::{Intent, IntentQueue},
    timeline::{DEFAULT_MAX_CLIPS, DEFAULT_PROJECT_NAME},
};

use std::{collections::VecDeque, sync::Arc};

use tracing::{error, info, instrument, trace, warn};
use uuid::Uuid;

/// Debug-channel notices held between loop iterations.
pub const NOTICE_CAPACITY: usize = 16;

/// Default file name of the rendered export artifact.
pub const DEFAULT_EXPORT_FILE: &str = "project.xml";

/// Tunables of a [`SyncSession`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Auto-record thresholds.
    pub thresholds: SchedulerThresholds,
    /// Clip capacity of a reconstructed timeline.
    pub max_clips: usize,
    /// File the rendered export is stored under.
    pub export_file: String,
    /// Project name written into the export.
    pub project_name: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            thresholds: SchedulerThresholds::default(),
            max_clips: DEFAULT_MAX_CLIPS,
            export_file: DEFAULT_EXPORT_FILE.to_string(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

/// Song state, auto-record scheduler and journal for one device.
pub struct SyncSession<S: Storage> {
    clock: Arc<SongClock>,
    metadata: MetadataStore,
    playing: bool,
    scheduler: AutoRecordScheduler,
    journal: EventJournal<S>,
    intents: IntentQueue,
    notices: VecDeque<String>,
    options: SessionOptions,
}

impl<S: Storage> SyncSession<S> {
    /// Create a session reading `clock` and journaling into `journal`.
    pub fn new(clock: Arc<SongClock>, journal: EventJournal<S>, options: SessionOptions) -> Self {
        Self {
            clock,
            metadata: MetadataStore::new(),
            playing: false,
            scheduler: AutoRecordScheduler::new(options.thresholds),
            journal,
            intents: IntentQueue::default(),
            notices: VecDeque::with_capacity(NOTICE_CAPACITY),
            options,
        }
    }

    /// Shared clock handle, for building transport dispatchers.
    pub fn clock(&self) -> &Arc<SongClock> {
        &self.clock
    }

    /// Committed song metadata.
    pub fn metadata(&self) -> &SongMetadata {
        self.metadata.current()
    }

    /// Playback state from the last `p` command.
    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Scheduler phase.
    pub fn phase(&self) -> SchedulerPhase {
        self.scheduler.phase()
    }

    /// File name of the open clip.
    pub fn active_clip(&self) -> Option<&str> {
        self.scheduler.active_clip()
    }

    /// Take one item off the transport queue.
    ///
    /// Commands are applied at the clock they were stamped with; rejected lines
    /// become notices.
    pub fn receive(&mut self, queued: QueuedCommand) {
        match queued {
            QueuedCommand::Apply { command, clock_ms } => self.apply(command, clock_ms),
            QueuedCommand::Rejected { line, reason } => {
                self.notice(format!("Unknown command: {} ({})", line, reason));
            }
        }
    }

    /// Apply one command as of song position `clock_ms`.
    #[instrument(skip(self))]
    pub fn apply(&mut self, command: Command, clock_ms: u32) {
        match command {
            Command::SetMetadata(update) => {
                let song = self.metadata.commit(&update).clone();
                info!(
                    uri = %song.uri,
                    title = %song.title,
                    duration_ms = song.duration_ms,
                    "Song metadata set"
                );

                let song_file = self.metadata.is_loaded().then(new_song_filename);
                if let Some(ended) = self.scheduler.load_song(song_file, clock_ms) {
                    self.record(ended);
                }

                self.append(JournalEntry::Song {
                    uri: song.uri.to_string(),
                    title: song.title.to_string(),
                    duration_ms: song.duration_ms,
                });
            }
            Command::SetPlayback { playing } => {
                self.playing = playing;
                info!(playing, "Playback state");
            }
            Command::Export => {
                self.intents.push(Intent::Export);
                info!("Export queued");
            }
            Command::ReadJournal => {
                self.intents.push(Intent::DumpJournal);
            }
            Command::ClearJournal => {
                if let Err(e) = self.journal.clear() {
                    warn!(error = %e, "Journal clear failed");
                    self.notice(format!("Journal clear failed: {}", e));
                }
            }
            Command::ClipStart { filename } => {
                for boundary in self.scheduler.start_clip(filename, clock_ms) {
                    self.record(boundary);
                }
            }
            Command::ClipEnd => match self.scheduler.end_clip(clock_ms) {
                Some(boundary) => self.record(boundary),
                None => {
                    warn!("No active clip");
                    self.notice("No active clip. Use a<filename> first.".to_string());
                }
            },
            Command::TriggerRecorder(RecorderAction::Start) => {
                self.intents.push(Intent::StartRecorder);
            }
            Command::TriggerRecorder(RecorderAction::Stop) => {
                self.intents.push(Intent::StopRecorder);
            }
        }
    }

    /// Run one scheduler evaluation against the current clock.
    pub fn tick(&mut self) {
        let input = TickInput {
            playing: self.playing,
            clock_ms: self.clock.get(),
            duration_ms: self.metadata.current().duration_ms,
        };

        if let Some(boundary) = self.scheduler.tick(input) {
            self.record(boundary);
        }
    }

    /// Remove pending intents, oldest first.
    pub fn drain_intents(&mut self) -> Vec<Intent> {
        self.intents.drain()
    }

    /// Remove pending debug-channel notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<String> {
        self.notices.drain(..).collect()
    }

    /// Rebuild the timeline from the journal, store the rendered artifact and
    /// return it.
    ///
    /// Fails without touching the journal when it cannot be read or holds more
    /// clips than the configured capacity.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn export_timeline(&mut self) -> CoreResult<String> {
        let entries = self.journal.read_all()?;
        let timeline = Timeline::reconstruct(&entries, self.options.max_clips)?;
        let rendered = timeline.render_xml(&self.options.project_name);

        let export_file = self.options.export_file.as_str();
        let storage = self.journal.storage_mut();
        let stored = storage
            .remove(export_file)
            .and_then(|()| storage.append(export_file, rendered.trim_end_matches('\n')));
        if let Err(e) = stored {
            warn!(error = %e, file = export_file, "Export artifact not stored");
        }

        info!(
            clip_count = timeline.clips.len(),
            bytes = rendered.len(),
            "Timeline exported"
        );

        Ok(rendered)
    }

    /// Storage shared by the journal and the export artifact.
    pub fn storage(&self) -> &S {
        self.journal.storage()
    }

    /// The raw journal text.
    #[track_caller]
    pub fn journal_text(&self) -> CoreResult<String> {
        self.journal.raw_text()
    }

    fn record(&mut self, boundary: ClipBoundary) {
        let drives_recorder = boundary.drives_recorder();
        let (entry, intent) = match boundary.kind {
            BoundaryKind::Start => (
                JournalEntry::ClipStart {
                    filename: boundary.filename,
                    song_ms: boundary.song_ms,
                },
                Intent::StartRecorder,
            ),
            BoundaryKind::End => (
                JournalEntry::ClipEnd {
                    filename: boundary.filename,
                    song_ms: boundary.song_ms,
                },
                Intent::StopRecorder,
            ),
        };

        self.append(entry);

        if drives_recorder && !self.intents.push(intent) {
            error!(?intent, "Recorder intent lost");
        }
    }

    fn append(&mut self, entry: JournalEntry) {
        if let Err(e) = self.journal.append(&entry) {
            warn!(error = %e, %entry, "Journal unavailable, event not recorded");
            self.notice(format!("Journal unavailable, not recorded: {}", entry));
        }
    }

    fn notice(&mut self, text: String) {
        if self.notices.len() >= NOTICE_CAPACITY {
            trace!(notice = %text, "Notice queue full");
            return;
        }
        self.notices.push_back(text);
    }
}

fn new_song_filename() -> String {
    format!("song_{}.mp4", Uuid::new_v4().simple())
}
