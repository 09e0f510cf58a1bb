//! Whole-song auto-record state machine.
//!
//! Decides when a clip starts and stops from three inputs: playback state, the
//! song clock and whether a song is loaded. It returns [`ClipBoundary`] values
//! and leaves journaling and recorder control to the caller.

use tracing::{debug, info};

/// Default window after song start within which auto-record may begin.
pub const DEFAULT_START_WINDOW_MS: u32 = 1500;

/// Default distance from the song end at which auto-record stops.
pub const DEFAULT_END_MARGIN_MS: u32 = 200;

/// Timing thresholds for auto start and stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerThresholds {
    /// A clip only auto-starts while `clock_ms <= start_window_ms`.
    pub start_window_ms: u32,
    /// A clip auto-stops once `clock_ms + end_margin_ms >= duration_ms`.
    pub end_margin_ms: u32,
}

impl Default for SchedulerThresholds {
    fn default() -> Self {
        Self {
            start_window_ms: DEFAULT_START_WINDOW_MS,
            end_margin_ms: DEFAULT_END_MARGIN_MS,
        }
    }
}

/// Externally visible scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// No song loaded; recording is impossible.
    Idle,
    /// Song loaded, not recording.
    Armed,
    /// A clip is open.
    Recording,
}

/// Whether a boundary opens or closes a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Clip opened.
    Start,
    /// Clip closed.
    End,
}

/// Why a boundary happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryReason {
    /// Playback running near the start of a loaded song.
    SongStart,
    /// Playback paused or stopped.
    PlaybackStopped,
    /// Clock reached the end margin of the song.
    SongEnd,
    /// New metadata arrived while a clip was open.
    SongReplaced,
    /// `a` / `b` commands.
    Manual,
}

/// A clip start or end the caller must journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipBoundary {
    /// Start or end.
    pub kind: BoundaryKind,
    /// File name of the clip.
    pub filename: String,
    /// Song clock at the boundary.
    pub song_ms: u32,
    /// What caused it.
    pub reason: BoundaryReason,
    /// Whether the clip opened or closed here was started by hand.
    pub manual_clip: bool,
}

impl ClipBoundary {
    /// Whether the external recorder should follow this boundary.
    ///
    /// Follows the clip, not the cause: an auto clip closed by `a` or `b`
    /// still stops the recorder, and a manual clip closed by a song change
    /// does not.
    pub fn drives_recorder(&self) -> bool {
        !self.manual_clip
    }
}

/// Inputs sampled once per host loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInput {
    /// Playback state from the last `p` command.
    pub playing: bool,
    /// Current song clock.
    pub clock_ms: u32,
    /// Duration of the loaded song, `0` when unknown.
    pub duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Armed {
        song_file: String,
    },
    Recording {
        clip_file: String,
        song_file: Option<String>,
        manual: bool,
    },
}

/// Auto-record state machine.
#[derive(Debug, Clone)]
pub struct AutoRecordScheduler {
    thresholds: SchedulerThresholds,
    state: State,
}

impl Default for AutoRecordScheduler {
    fn default() -> Self {
        Self::new(SchedulerThresholds::default())
    }
}

impl AutoRecordScheduler {
    /// Create an idle scheduler.
    pub fn new(thresholds: SchedulerThresholds) -> Self {
        Self {
            thresholds,
            state: State::Idle,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SchedulerPhase {
        match self.state {
            State::Idle => SchedulerPhase::Idle,
            State::Armed { .. } => SchedulerPhase::Armed,
            State::Recording { .. } => SchedulerPhase::Recording,
        }
    }

    /// File name of the open clip, if recording.
    pub fn active_clip(&self) -> Option<&str> {
        match &self.state {
            State::Recording { clip_file, .. } => Some(clip_file),
            _ => None,
        }
    }

    /// React to a metadata replacement.
    ///
    /// An open clip is always closed first. Afterwards the scheduler is armed
    /// with `song_file` when a song is loaded, otherwise idle.
    pub fn load_song(&mut self, song_file: Option<String>, clock_ms: u32) -> Option<ClipBoundary> {
        let ended = self.close(clock_ms, BoundaryReason::SongReplaced);

        self.state = match song_file {
            Some(song_file) => {
                info!(song_file = %song_file, "Scheduler armed for new song");
                State::Armed { song_file }
            }
            None => State::Idle,
        };

        ended
    }

    /// Evaluate the transitions once. At most one boundary is produced per tick.
    pub fn tick(&mut self, input: TickInput) -> Option<ClipBoundary> {
        match &self.state {
            State::Idle => None,
            State::Armed { song_file } => {
                if !input.playing || input.clock_ms > self.thresholds.start_window_ms {
                    return None;
                }

                let song_file = song_file.clone();
                self.state = State::Recording {
                    clip_file: song_file.clone(),
                    song_file: Some(song_file.clone()),
                    manual: false,
                };
                info!(filename = %song_file, clock_ms = input.clock_ms, "Auto-record start (song begin)");

                Some(ClipBoundary {
                    kind: BoundaryKind::Start,
                    filename: song_file,
                    song_ms: input.clock_ms,
                    reason: BoundaryReason::SongStart,
                    manual_clip: false,
                })
            }
            State::Recording { manual: true, .. } => None,
            State::Recording { .. } => {
                // Pause wins over song end so a song paused at its end closes once.
                if !input.playing {
                    info!(clock_ms = input.clock_ms, "Auto-record stop (playback stopped)");
                    return self.close(input.clock_ms, BoundaryReason::PlaybackStopped);
                }

                let at_end = input.duration_ms > 0
                    && input.clock_ms.saturating_add(self.thresholds.end_margin_ms)
                        >= input.duration_ms;
                if at_end {
                    info!(
                        clock_ms = input.clock_ms,
                        duration_ms = input.duration_ms,
                        "Auto-record stop (song end)"
                    );
                    return self.close(input.clock_ms, BoundaryReason::SongEnd);
                }

                None
            }
        }
    }

    /// Open a clip by hand, closing any open clip first.
    ///
    /// Manual clips are not auto-stopped; they end with [`end_clip`](Self::end_clip)
    /// or when a new song is loaded.
    pub fn start_clip(&mut self, filename: String, clock_ms: u32) -> Vec<ClipBoundary> {
        let mut boundaries = Vec::with_capacity(2);
        boundaries.extend(self.close(clock_ms, BoundaryReason::Manual));

        let song_file = match &self.state {
            State::Armed { song_file } => Some(song_file.clone()),
            _ => None,
        };
        self.state = State::Recording {
            clip_file: filename.clone(),
            song_file,
            manual: true,
        };
        debug!(filename = %filename, clock_ms, "Manual clip start");

        boundaries.push(ClipBoundary {
            kind: BoundaryKind::Start,
            filename,
            song_ms: clock_ms,
            reason: BoundaryReason::Manual,
            manual_clip: true,
        });
        boundaries
    }

    /// Close the open clip by hand. `None` if nothing was recording.
    pub fn end_clip(&mut self, clock_ms: u32) -> Option<ClipBoundary> {
        self.close(clock_ms, BoundaryReason::Manual)
    }

    fn close(&mut self, clock_ms: u32, reason: BoundaryReason) -> Option<ClipBoundary> {
        let (clip_file, song_file, manual) = match std::mem::replace(&mut self.state, State::Idle)
        {
            State::Recording {
                clip_file,
                song_file,
                manual,
            } => (clip_file, song_file, manual),
            other => {
                self.state = other;
                return None;
            }
        };

        self.state = match song_file {
            Some(song_file) => State::Armed { song_file },
            None => State::Idle,
        };

        Some(ClipBoundary {
            kind: BoundaryKind::End,
            filename: clip_file,
            song_ms: clock_ms,
            reason,
            manual_clip: manual,
        })
    }
}
