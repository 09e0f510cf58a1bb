use crate::{CoreError, CoreResult, journal::JournalEntry};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Default maximum number of clips in one reconstructed timeline.
pub const DEFAULT_MAX_CLIPS: usize = 32;

/// The song a timeline belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    /// Track URI.
    pub uri: String,
    /// Track title.
    pub title: String,
    /// Track length, `0` when unknown.
    pub duration_ms: u32,
}

/// One recorded clip, positioned on the song clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    /// Clip file name.
    pub file: String,
    /// Song clock when the clip opened.
    pub start_ms: u32,
    /// Song clock when the clip closed.
    pub end_ms: u32,
}

/// Project timeline derived from the journal. Never stored on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    /// Last song seen in the journal.
    pub song: Option<SongRecord>,
    /// Completed clips, ordered by their closing entry.
    pub clips: Vec<Clip>,
}

impl Timeline {
    /// Replay `entries` into a timeline holding at most `capacity` clips.
    ///
    /// A start replaces any open start without emitting it; an end with no
    /// open start is ignored. Exceeding `capacity` fails instead of dropping
    /// clips.
    #[track_caller]
    #[instrument(skip(entries), fields(entry_count = entries.len()))]
    pub fn reconstruct(entries: &[JournalEntry], capacity: usize) -> CoreResult<Timeline> {
        let mut timeline = Timeline::default();
        let mut open: Option<(&str, u32)> = None;

        for entry in entries {
            match entry {
                JournalEntry::Song {
                    uri,
                    title,
                    duration_ms,
                } => {
                    timeline.song = Some(SongRecord {
                        uri: uri.clone(),
                        title: title.clone(),
                        duration_ms: *duration_ms,
                    });
                }
                JournalEntry::ClipStart { filename, song_ms } => {
                    if let Some((dropped, _)) = open {
                        debug!(file = dropped, "Dropping unterminated clip start");
                    }
                    open = Some((filename.as_str(), *song_ms));
                }
                JournalEntry::ClipEnd { song_ms, .. } => {
                    let Some((file, start_ms)) = open.take() else {
                        continue;
                    };
                    if timeline.clips.len() >= capacity {
                        return Err(CoreError::ExportCapacityExceeded {
                            capacity,
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }
                    timeline.clips.push(Clip {
                        file: file.to_string(),
                        start_ms,
                        end_ms: *song_ms,
                    });
                }
            }
        }

        debug!(clip_count = timeline.clips.len(), "Timeline reconstructed");

        Ok(timeline)
    }
}
