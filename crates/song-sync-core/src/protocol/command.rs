use crate::{CoreError, CoreResult, song::MetadataUpdate};

/// Manual action on the external recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderAction {
    /// Start recording (`g s`).
    Start,
    /// Stop recording (`g e`).
    Stop,
}

/// Text commands accepted from either transport.
///
/// Clock updates are not part of this enum: an all-digit write never reaches the
/// text parser and is applied to the [`SongClock`](crate::SongClock) directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `m key=value;...` - replace song metadata and re-arm the scheduler.
    SetMetadata(MetadataUpdate),
    /// `p1` plays, `p` followed by anything else (including `p 1`) pauses.
    SetPlayback {
        /// New playback state.
        playing: bool,
    },
    /// `x` - reconstruct the timeline and deliver the export.
    Export,
    /// `r` - dump the raw journal to the debug channel.
    ReadJournal,
    /// `c` - truncate the journal.
    ClearJournal,
    /// `a<filename>` - open a clip without waiting for the scheduler.
    ClipStart {
        /// Clip file name to record in the journal.
        filename: String,
    },
    /// `b` - close the open clip.
    ClipEnd,
    /// `g s` / `g e` - drive the external recorder by hand.
    TriggerRecorder(RecorderAction),
}

impl Command {
    /// Parse one trimmed command line.
    ///
    /// The first character selects the variant; the remainder, trimmed, is
    /// handed to that variant's parser. Playback looks at the untrimmed
    /// remainder.
    #[track_caller]
    pub fn parse(line: &str) -> CoreResult<Command> {
        let line = line.trim();
        let mut chars = line.chars();
        let Some(prefix) = chars.next() else {
            return Err(CoreError::malformed("empty command"));
        };
        let raw_payload = chars.as_str();
        let payload = raw_payload.trim();

        match prefix {
            'm' => parse_metadata(payload).map(Command::SetMetadata),
            // Only the character right after `p` counts, so `p 1` pauses.
            'p' => Ok(Command::SetPlayback {
                playing: raw_payload.starts_with('1'),
            }),
            'x' => Ok(Command::Export),
            'r' => Ok(Command::ReadJournal),
            'c' => Ok(Command::ClearJournal),
            'a' => parse_clip_start(payload),
            'b' => Ok(Command::ClipEnd),
            'g' => parse_recorder_action(payload).map(Command::TriggerRecorder),
            other => Err(CoreError::malformed(format!(
                "unknown command prefix '{}' in {:?}",
                other, line
            ))),
        }
    }
}

#[track_caller]
fn parse_metadata(payload: &str) -> CoreResult<MetadataUpdate> {
    if payload.is_empty() {
        return Err(CoreError::malformed("metadata: empty payload"));
    }

    let mut update = MetadataUpdate::default();

    for token in payload.split(';') {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key.eq_ignore_ascii_case("uri") {
            update.uri = Some(value.to_string());
        } else if key.eq_ignore_ascii_case("title") {
            update.title = Some(value.to_string());
        } else if key.eq_ignore_ascii_case("dur") || key.eq_ignore_ascii_case("duration") {
            update.duration_ms = Some(parse_u32_lenient(value));
        }
    }

    if update == MetadataUpdate::default() {
        return Err(CoreError::malformed(format!(
            "metadata: no uri, title or dur key in {:?}",
            payload
        )));
    }

    Ok(update)
}

#[track_caller]
fn parse_clip_start(payload: &str) -> CoreResult<Command> {
    if payload.is_empty() {
        return Err(CoreError::malformed(
            "clip start: provide a filename, e.g. aGOPR0001.MP4",
        ));
    }

    Ok(Command::ClipStart {
        filename: payload.to_string(),
    })
}

#[track_caller]
fn parse_recorder_action(payload: &str) -> CoreResult<RecorderAction> {
    match payload {
        "s" => Ok(RecorderAction::Start),
        "e" => Ok(RecorderAction::Stop),
        other => Err(CoreError::malformed(format!(
            "recorder trigger: expected 's' or 'e', got {:?}",
            other
        ))),
    }
}

/// Parse a decimal `u32` the way the phone's numbers are read everywhere:
/// leading whitespace and an optional `+` are skipped, digits are consumed until
/// the first non-digit, overflow saturates at `u32::MAX`, and no digits yields `0`.
pub fn parse_u32_lenient(text: &str) -> u32 {
    let text = text.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);

    text.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add(u32::from(digit - b'0'))
        })
}
