use crate::{DebugConsole, SerialReader, tests::SharedBuffer};

use std::sync::Arc;

use song_sync_core::{Command, DispatchOutcome, Dispatcher, QueuedCommand, SongClock};
use tokio::sync::{mpsc, watch};

fn applied(command: Command, clock_ms: u32) -> QueuedCommand {
    QueuedCommand::Apply { command, clock_ms }
}

fn reader() -> (SerialReader, Arc<SongClock>, mpsc::Receiver<QueuedCommand>) {
    let clock = Arc::new(SongClock::new());
    let (command_tx, command_rx) = mpsc::channel(8);
    let reader = SerialReader::new(Dispatcher::new(Arc::clone(&clock), command_tx));
    (reader, clock, command_rx)
}

/// WHAT: Lines split across reads are dispatched once complete
/// WHY: Stdin delivers arbitrary chunks, not whole commands
#[test]
#[allow(clippy::unwrap_used)]
fn given_split_line_when_ingesting_then_dispatched_on_terminator() {
    // Given: A serial reader
    let (mut reader, clock, mut command_rx) = reader();

    // When: A clock value arrives in two pieces
    assert!(reader.ingest(b"123").is_empty());
    let outcomes = reader.ingest(b"45\r\n");

    // Then: One clock update for the whole value
    assert_eq!(outcomes, vec![DispatchOutcome::ClockUpdated(12345)]);
    assert_eq!(clock.get(), 12345);
    assert!(command_rx.try_recv().is_err());
}

/// WHAT: Several commands in one read are queued in order
/// WHY: Pasted input must not lose commands
#[test]
#[allow(clippy::unwrap_used)]
fn given_several_lines_in_one_read_when_ingesting_then_all_queued() {
    let (mut reader, _clock, mut command_rx) = reader();

    let outcomes = reader.ingest(b"p1\nx\n\nr\n");

    assert_eq!(
        outcomes,
        vec![
            DispatchOutcome::Queued,
            DispatchOutcome::Queued,
            DispatchOutcome::Queued
        ]
    );
    assert_eq!(
        command_rx.try_recv().unwrap(),
        applied(Command::SetPlayback { playing: true }, 0)
    );
    assert_eq!(command_rx.try_recv().unwrap(), applied(Command::Export, 0));
    assert_eq!(
        command_rx.try_recv().unwrap(),
        applied(Command::ReadJournal, 0)
    );
}

/// WHAT: The reader stops at end of input after dispatching everything
/// WHY: A closed stdin must not stall the other tasks
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_finite_input_when_running_then_returns_after_dispatch() {
    let (reader, clock, mut command_rx) = reader();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    reader
        .run(&b"777\nc\n"[..], shutdown_rx)
        .await
        .unwrap();

    assert_eq!(clock.get(), 777);
    assert_eq!(
        command_rx.try_recv().unwrap(),
        applied(Command::ClearJournal, 777)
    );
}

/// WHAT: Dumps are framed by a banner line
/// WHY: Operators read raw files off the console
#[test]
fn given_contents_when_dumping_then_banner_then_text() {
    let buffer = SharedBuffer::default();
    let mut console = DebugConsole::new(Box::new(buffer.clone()));

    console.dump("events.log", "SONG uri=\"x\" title=\"\" durationMs=0\n");

    assert_eq!(
        buffer.contents(),
        "\n--- events.log ---\nSONG uri=\"x\" title=\"\" durationMs=0\n"
    );
}
