//! Song-Sync Core Library
//!
//! Keeps a camera's clip recording in step with the song playing on a paired
//! phone. Transport writes are classified into clock updates and commands, a
//! scheduler decides when clips start and stop, every domain event goes to an
//! append-only journal, and the journal replays into a project timeline that is
//! shipped back over a size-limited notification channel.
//!
//! # Example
//!
//! ```
//! use song_sync_core::{
//!     Dispatcher, EventJournal, MemoryStorage, SchedulerPhase, SessionOptions, SongClock,
//!     SyncSession,
//! };
//!
//! use std::sync::Arc;
//!
//! use tokio::sync::mpsc;
//!
//! let clock = Arc::new(SongClock::new());
//! let (command_tx, mut command_rx) = mpsc::channel(32);
//! let dispatcher = Dispatcher::new(Arc::clone(&clock), command_tx);
//!
//! let journal = EventJournal::new(MemoryStorage::new(), "events.log");
//! let mut session = SyncSession::new(clock, journal, SessionOptions::default());
//!
//! dispatcher.handle_bytes(b"m uri=spotify:track:1;title=Song;dur=5000");
//! dispatcher.handle_bytes(b"p1");
//! dispatcher.handle_bytes(b"0");
//!
//! while let Ok(queued) = command_rx.try_recv() {
//!     session.receive(queued);
//! }
//! session.tick();
//!
//! assert_eq!(session.phase(), SchedulerPhase::Recording);
//! ```

mod error;
mod journal;
mod notify;
mod protocol;
mod scheduler;
mod session;
mod song;
mod timeline;

pub use {
    error::{CoreError, Result as CoreResult},
    journal::{DEFAULT_JOURNAL_FILE, EventJournal, FsStorage, JournalEntry, MemoryStorage, Storage},
    notify::{DEFAULT_CHUNK_SIZE, Frame, FrameAssembler, encode_frames},
    protocol::{
        Command, DispatchOutcome, Dispatcher, Inbound, LINE_CAPACITY, LineAccumulator,
        MAX_WRITE_LEN, QueuedCommand, RecorderAction, classify, parse_u32_lenient,
    },
    scheduler::{
        AutoRecordScheduler, BoundaryKind, BoundaryReason, ClipBoundary, DEFAULT_END_MARGIN_MS,
        DEFAULT_START_WINDOW_MS, SchedulerPhase, SchedulerThresholds, TickInput,
    },
    session::{
        DEFAULT_EXPORT_FILE, DEFAULT_INTENT_CAPACITY, Intent, IntentQueue, NOTICE_CAPACITY,
        SessionOptions, SyncSession,
    },
    song::{
        BoundedString, MetadataStore, MetadataUpdate, SongClock, SongMetadata, TITLE_CAPACITY,
        URI_CAPACITY,
    },
    timeline::{Clip, DEFAULT_MAX_CLIPS, DEFAULT_PROJECT_NAME, SongRecord, Timeline},
};

#[cfg(test)]
mod tests;
