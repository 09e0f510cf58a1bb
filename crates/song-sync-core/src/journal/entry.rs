use crate::protocol::parse_u32_lenient;

use std::fmt;

/// One domain event in the journal.
///
/// On disk each entry is a single line with a stable field order:
///
/// ```text
/// SONG uri="spotify:track:1" title="Song" durationMs=210000
/// CLIP_START file="song_1.mp4" songMs=0
/// CLIP_END file="song_1.mp4" songMs=209850
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    /// A song was loaded.
    Song {
        /// Track URI.
        uri: String,
        /// Track title.
        title: String,
        /// Track length, `0` when unknown.
        duration_ms: u32,
    },
    /// A clip was opened.
    ClipStart {
        /// Clip file name.
        filename: String,
        /// Song clock at the start.
        song_ms: u32,
    },
    /// A clip was closed.
    ClipEnd {
        /// Clip file name.
        filename: String,
        /// Song clock at the end.
        song_ms: u32,
    },
}

impl JournalEntry {
    /// Decode one journal line. Unknown tags yield `None`; missing fields
    /// default to empty text or zero.
    pub fn parse_line(line: &str) -> Option<JournalEntry> {
        let line = line.trim();
        let (tag, _) = line.split_once(' ').unwrap_or((line, ""));

        match tag {
            "SONG" => Some(JournalEntry::Song {
                uri: quoted_field(line, "uri"),
                title: quoted_field(line, "title"),
                duration_ms: numeric_field(line, "durationMs"),
            }),
            "CLIP_START" => Some(JournalEntry::ClipStart {
                filename: quoted_field(line, "file"),
                song_ms: numeric_field(line, "songMs"),
            }),
            "CLIP_END" => Some(JournalEntry::ClipEnd {
                filename: quoted_field(line, "file"),
                song_ms: numeric_field(line, "songMs"),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalEntry::Song {
                uri,
                title,
                duration_ms,
            } => write!(
                f,
                "SONG uri=\"{}\" title=\"{}\" durationMs={}",
                sanitize(uri),
                sanitize(title),
                duration_ms
            ),
            JournalEntry::ClipStart { filename, song_ms } => {
                write!(f, "CLIP_START file=\"{}\" songMs={}", sanitize(filename), song_ms)
            }
            JournalEntry::ClipEnd { filename, song_ms } => {
                write!(f, "CLIP_END file=\"{}\" songMs={}", sanitize(filename), song_ms)
            }
        }
    }
}

// Values are unescaped on disk: quotes would end the field early and line
// breaks would split the entry.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '"' => '\'',
            '\r' | '\n' => ' ',
            other => other,
        })
        .collect()
}

fn quoted_field(line: &str, key: &str) -> String {
    let marker = format!(" {}=\"", key);
    let Some(start) = line.find(&marker).map(|i| i + marker.len()) else {
        return String::new();
    };
    let rest = &line[start..];
    let end = rest.find('"').unwrap_or(rest.len());
    rest[..end].to_string()
}

// Numeric fields follow every quoted field, so only the text after the last
// quote is searched; a value containing ` songMs=` cannot shadow the real one.
fn numeric_field(line: &str, key: &str) -> u32 {
    let tail = line.rfind('"').map_or(line, |i| &line[i + 1..]);
    let marker = format!(" {}=", key);
    tail.find(&marker)
        .map(|i| parse_u32_lenient(&tail[i + marker.len()..]))
        .unwrap_or(0)
}
