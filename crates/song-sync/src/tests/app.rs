use crate::{App, AppError, AppResult, DebugConsole, NotifyHub, RecorderControl, tests::SharedBuffer};

use std::{
    num::NonZeroUsize,
    panic::Location,
    sync::{Arc, Mutex},
    time::Duration,
};

use error_location::ErrorLocation;
use song_sync_core::{
    Dispatcher, EventJournal, Frame, FrameAssembler, MemoryStorage, SchedulerPhase,
    SessionOptions, SongClock, Storage, SyncSession,
};
use tokio::sync::{mpsc, watch};

#[derive(Clone, Default)]
struct FakeRecorder {
    calls: Arc<Mutex<Vec<&'static str>>>,
    offline: bool,
}

impl FakeRecorder {
    #[allow(clippy::unwrap_used)]
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    #[allow(clippy::unwrap_used)]
    fn record(&self, call: &'static str) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.offline {
            return Err(AppError::RecorderUnreachable {
                reason: "camera offline".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

impl RecorderControl for FakeRecorder {
    async fn trigger_start(&self) -> AppResult<()> {
        self.record("start")
    }

    async fn trigger_stop(&self) -> AppResult<()> {
        self.record("stop")
    }
}

struct Harness {
    app: App<MemoryStorage, FakeRecorder>,
    dispatcher: Dispatcher,
    recorder: FakeRecorder,
    console: SharedBuffer,
    _shutdown_tx: watch::Sender<bool>,
}

impl Harness {
    fn new(recorder: FakeRecorder, options: SessionOptions) -> Self {
        let clock = Arc::new(SongClock::new());
        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let console = SharedBuffer::default();
        let chunk_size = NonZeroUsize::new(64).unwrap_or(song_sync_core::DEFAULT_CHUNK_SIZE);

        let app = App {
            session: SyncSession::new(
                Arc::clone(&clock),
                EventJournal::new(MemoryStorage::new(), "events.log"),
                options,
            ),
            command_rx,
            recorder: recorder.clone(),
            hub: NotifyHub::new(chunk_size, Duration::ZERO),
            console: DebugConsole::new(Box::new(console.clone())),
            tick_interval: Duration::from_millis(10),
            journal_file: "events.log".to_string(),
            export_file: "project.xml".to_string(),
            shutdown_rx,
        };

        Self {
            app,
            dispatcher: Dispatcher::new(clock, command_tx),
            recorder,
            console,
            _shutdown_tx: shutdown_tx,
        }
    }

    async fn step(&mut self, writes: &[&str]) {
        for write in writes {
            self.dispatcher.handle_bytes(write.as_bytes());
        }
        self.app.iterate().await;
    }
}

/// WHAT: The camera follows auto-record start and stop
/// WHY: Recorder calls happen on the loop, after the scheduler decides
#[tokio::test]
async fn given_song_played_through_when_iterating_then_camera_started_and_stopped() {
    // Given: A loop with a reachable camera
    let mut h = Harness::new(FakeRecorder::default(), SessionOptions::default());

    // When: A song starts playing from zero
    h.step(&["m uri=x;title=Song;dur=5000", "p1", "0"]).await;

    // Then: The camera is started
    assert_eq!(h.recorder.calls(), vec!["start"]);
    assert!(h.console.contents().contains("[camera] rec START ok"));

    // When: The clock reaches the end margin
    h.step(&["5150"]).await;

    // Then: The camera is stopped
    assert_eq!(h.recorder.calls(), vec!["start", "stop"]);
    assert!(h.console.contents().contains("[camera] rec STOP ok"));
}

/// WHAT: A failed camera call does not roll back the scheduler
/// WHY: The journal is authoritative and triggers are not retried
#[tokio::test]
async fn given_offline_camera_when_recording_then_scheduler_state_kept() {
    // Given: A loop with an unreachable camera
    let mut h = Harness::new(
        FakeRecorder {
            offline: true,
            ..FakeRecorder::default()
        },
        SessionOptions::default(),
    );

    // When: Auto-record starts
    h.step(&["m uri=x;dur=5000", "p1", "0"]).await;

    // Then: The failure is reported and the scheduler is still recording
    assert!(h.console.contents().contains("[camera] rec START FAIL"));
    assert_eq!(h.app.session.phase(), SchedulerPhase::Recording);

    // When: Playback stops
    h.step(&["p0"]).await;

    // Then: The stop failure is reported and the scheduler is armed again
    assert!(h.console.contents().contains("[camera] rec STOP FAIL"));
    assert_eq!(h.app.session.phase(), SchedulerPhase::Armed);
    assert_eq!(h.recorder.calls(), vec!["start", "stop"]);
}

/// WHAT: Export without a subscriber goes to the debug channel
/// WHY: The timeline must still be retrievable without a link client
#[tokio::test]
async fn given_no_subscriber_when_exporting_then_printed_to_console() {
    // Given: A loop with one logged song and no link client
    let mut h = Harness::new(FakeRecorder::default(), SessionOptions::default());
    h.step(&["m uri=x;title=Song;dur=5000"]).await;

    // When: Export is requested
    h.step(&["x"]).await;

    // Then: The artifact is printed under its file name
    let out = h.console.contents();
    assert!(out.contains("--- project.xml ---"));
    assert!(out.contains(r#"<Song uri="x" title="Song" durationMs="5000"/>"#));
}

/// WHAT: Export with a subscriber is sent as frames that reassemble to the artifact
/// WHY: The phone receives the project over the size-limited notify channel
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_subscriber_when_exporting_then_frames_reassemble_to_artifact() {
    // Given: A subscribed client and a recorded clip
    let mut h = Harness::new(FakeRecorder::default(), SessionOptions::default());
    let mut rx = h.app.hub.subscribe();
    h.step(&["m uri=spotify:track:1;title=Long enough to need several chunks;dur=9000", "p1", "0"])
        .await;
    h.step(&["4000", "p0"]).await;

    // When: Export is requested
    h.step(&["x"]).await;

    // Then: The frames reassemble to the stored artifact
    let mut assembler = FrameAssembler::new();
    let mut payload = None;
    while let Ok(bytes) = rx.try_recv() {
        let frame = Frame::parse(&bytes).unwrap();
        if let Some(done) = assembler.push(frame).unwrap() {
            payload = Some(done);
        }
    }
    let payload = String::from_utf8(payload.unwrap()).unwrap();
    let stored = h.app.session.storage().read_all("project.xml").unwrap();

    assert_eq!(payload.trim_end(), stored.trim_end());
    assert!(payload.contains(r#"startSongMs="0" endSongMs="4000""#));
    assert!(h.console.contents().contains("[link] XML sent"));
}

/// WHAT: An export over capacity is reported and nothing is sent
/// WHY: Capacity failure aborts the export outright
#[tokio::test]
async fn given_too_many_clips_when_exporting_then_failure_reported_and_nothing_sent() {
    // Given: Capacity one, two manual clips and a subscribed client
    let mut h = Harness::new(
        FakeRecorder::default(),
        SessionOptions {
            max_clips: 1,
            ..SessionOptions::default()
        },
    );
    let mut rx = h.app.hub.subscribe();
    h.step(&["a one", "b", "a two", "b"]).await;

    // When: Export is requested
    h.step(&["x"]).await;

    // Then: Failure on the console, no frames
    assert!(h.console.contents().contains("Export failed"));
    assert!(rx.try_recv().is_err());
}

/// WHAT: Reading the journal prints it raw
/// WHY: The debug channel is how operators inspect the log
#[tokio::test]
async fn given_logged_song_when_reading_journal_then_raw_lines_printed() {
    let mut h = Harness::new(FakeRecorder::default(), SessionOptions::default());

    h.step(&["m uri=x;title=Song;dur=5000", "r"]).await;

    let out = h.console.contents();
    assert!(out.contains("--- events.log ---"));
    assert!(out.contains(r#"SONG uri="x" title="Song" durationMs=5000"#));
}

/// WHAT: Unknown commands and stray clip ends are reported on the console
/// WHY: The console is the only feedback the operator gets for bad input
#[tokio::test]
async fn given_unknown_command_when_iterating_then_console_reports_it() {
    let mut h = Harness::new(FakeRecorder::default(), SessionOptions::default());

    h.step(&["zzz", "b"]).await;

    let out = h.console.contents();
    assert!(out.contains("Unknown command: zzz"));
    assert!(out.contains("No active clip. Use a<filename> first."));
    assert!(h.recorder.calls().is_empty());
}

/// WHAT: Manual triggers reach the camera in arrival order
/// WHY: Intents queued within one iteration must all be performed
#[tokio::test]
async fn given_manual_triggers_when_iterating_then_camera_called_in_order() {
    let mut h = Harness::new(FakeRecorder::default(), SessionOptions::default());

    h.step(&["g s", "g e", "g s"]).await;

    assert_eq!(h.recorder.calls(), vec!["start", "stop", "start"]);
}
