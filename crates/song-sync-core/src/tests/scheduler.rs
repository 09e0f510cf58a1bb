use crate::{
    AutoRecordScheduler, BoundaryKind, BoundaryReason, SchedulerPhase, SchedulerThresholds,
    TickInput,
};

const SONG_FILE: &str = "song_a.mp4";
const DURATION_MS: u32 = 5000;

fn input(playing: bool, clock_ms: u32) -> TickInput {
    TickInput {
        playing,
        clock_ms,
        duration_ms: DURATION_MS,
    }
}

fn armed() -> AutoRecordScheduler {
    let mut scheduler = AutoRecordScheduler::new(SchedulerThresholds::default());
    assert!(scheduler.load_song(Some(SONG_FILE.to_string()), 0).is_none());
    scheduler
}

fn recording() -> AutoRecordScheduler {
    let mut scheduler = armed();
    assert!(scheduler.tick(input(true, 0)).is_some());
    scheduler
}

/// WHAT: Without a loaded song the scheduler never records
/// WHY: Idle means recording is impossible
#[test]
fn given_idle_scheduler_when_ticking_while_playing_then_stays_idle() {
    let mut scheduler = AutoRecordScheduler::default();

    assert!(scheduler.tick(input(true, 0)).is_none());
    assert_eq!(scheduler.phase(), SchedulerPhase::Idle);
}

/// WHAT: Playing inside the start window opens a clip on the song file
/// WHY: Auto-record covers the whole song from its beginning
#[test]
#[allow(clippy::unwrap_used)]
fn given_armed_and_playing_near_start_when_ticking_then_recording() {
    // Given: An armed scheduler
    let mut scheduler = armed();

    // When: Ticking while playing at the window edge
    let boundary = scheduler.tick(input(true, 1500)).unwrap();

    // Then: A start boundary at the clock on the song file
    assert_eq!(boundary.kind, BoundaryKind::Start);
    assert_eq!(boundary.filename, SONG_FILE);
    assert_eq!(boundary.song_ms, 1500);
    assert_eq!(boundary.reason, BoundaryReason::SongStart);
    assert!(boundary.drives_recorder());
    assert_eq!(scheduler.phase(), SchedulerPhase::Recording);
    assert_eq!(scheduler.active_clip(), Some(SONG_FILE));
}

/// WHAT: Past the start window the scheduler never starts, playing or not
/// WHY: A song loaded mid-play must not produce a partial clip
#[test]
fn given_clock_past_window_when_ticking_then_never_starts() {
    let mut scheduler = armed();

    for clock_ms in [1501, 2000, 4999, u32::MAX] {
        for playing in [true, false] {
            assert!(scheduler.tick(input(playing, clock_ms)).is_none());
            assert_eq!(scheduler.phase(), SchedulerPhase::Armed);
        }
    }
}

/// WHAT: Pausing ends the clip
/// WHY: A stopped song should not keep the camera rolling
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_paused_then_clip_ends() {
    let mut scheduler = recording();

    let boundary = scheduler.tick(input(false, 2300)).unwrap();

    assert_eq!(boundary.kind, BoundaryKind::End);
    assert_eq!(boundary.song_ms, 2300);
    assert_eq!(boundary.reason, BoundaryReason::PlaybackStopped);
    assert_eq!(scheduler.phase(), SchedulerPhase::Armed);
    assert_eq!(scheduler.active_clip(), None);
}

/// WHAT: Reaching the end margin ends the clip
/// WHY: Recording stops with the song, not after it
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_clock_reaches_end_margin_then_clip_ends() {
    let mut scheduler = recording();

    assert!(scheduler.tick(input(true, 4799)).is_none());
    let boundary = scheduler.tick(input(true, 4800)).unwrap();

    assert_eq!(boundary.reason, BoundaryReason::SongEnd);
    assert_eq!(boundary.song_ms, 4800);
}

/// WHAT: A song paused at its end closes exactly once
/// WHY: The pause check short-circuits the end check
#[test]
fn given_paused_at_end_when_ticking_twice_then_one_end() {
    let mut scheduler = recording();

    let first = scheduler.tick(input(false, 4900));
    let second = scheduler.tick(input(false, 4900));

    assert!(matches!(
        first.map(|b| b.reason),
        Some(BoundaryReason::PlaybackStopped)
    ));
    assert!(second.is_none());
}

/// WHAT: Unknown duration disables the end stop
/// WHY: Duration zero means unknown, not a zero-length song
#[test]
fn given_unknown_duration_when_ticking_late_then_keeps_recording() {
    let mut scheduler = recording();

    let boundary = scheduler.tick(TickInput {
        playing: true,
        clock_ms: 600_000,
        duration_ms: 0,
    });

    assert!(boundary.is_none());
    assert_eq!(scheduler.phase(), SchedulerPhase::Recording);
}

/// WHAT: Loading a song while recording ends the open clip exactly once
/// WHY: Every clip start must be matched before the next song is armed
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_loading_new_song_then_one_end_and_rearmed() {
    // Given: A recording scheduler
    let mut scheduler = recording();

    // When: A new song is loaded
    let ended = scheduler
        .load_song(Some("song_b.mp4".to_string()), 3100)
        .unwrap();

    // Then: The old clip ends and the new song is armed
    assert_eq!(ended.kind, BoundaryKind::End);
    assert_eq!(ended.filename, SONG_FILE);
    assert_eq!(ended.reason, BoundaryReason::SongReplaced);
    assert_eq!(scheduler.phase(), SchedulerPhase::Armed);

    // And the next start uses the new file
    let started = scheduler.tick(input(true, 0)).unwrap();
    assert_eq!(started.filename, "song_b.mp4");
}

/// WHAT: Manual clips bypass auto-start and are not auto-stopped
/// WHY: The a/b commands give the operator direct control
#[test]
#[allow(clippy::unwrap_used)]
fn given_manual_clip_when_paused_then_clip_stays_open_until_end_command() {
    // Given: An idle scheduler and a manual clip
    let mut scheduler = AutoRecordScheduler::default();
    let started = scheduler.start_clip("GOPR0001.MP4".to_string(), 62351);

    // Then: One manual start, journal-only
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].reason, BoundaryReason::Manual);
    assert!(!started[0].drives_recorder());

    // When: Ticking while paused
    assert!(scheduler.tick(input(false, 70000)).is_none());
    assert_eq!(scheduler.active_clip(), Some("GOPR0001.MP4"));

    // Then: Only the end command closes it, returning to idle
    let ended = scheduler.end_clip(71000).unwrap();
    assert_eq!(ended.song_ms, 71000);
    assert_eq!(scheduler.phase(), SchedulerPhase::Idle);
    assert!(scheduler.end_clip(72000).is_none());
}

/// WHAT: A manual start while recording closes the open clip first
/// WHY: Keeps every end paired with exactly one start
#[test]
fn given_recording_when_manual_start_then_end_precedes_start() {
    let mut scheduler = recording();

    let boundaries = scheduler.start_clip("manual.mp4".to_string(), 900);

    let kinds: Vec<_> = boundaries.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BoundaryKind::End, BoundaryKind::Start]);
    assert_eq!(boundaries[0].filename, SONG_FILE);
    // The automatic clip still stops the recorder; the manual one never starts it
    assert!(boundaries[0].drives_recorder());
    assert!(!boundaries[1].drives_recorder());
}
