//! Transport-side half of command handling.
//!
//! Runs in whatever context delivers the bytes (a link callback, the serial
//! reader). It only writes the song clock and hands parsed commands to the host
//! loop; it never blocks and never touches storage.
//!
//! Each queued command carries the clock value read when it arrived, so a clock
//! write that lands before the loop runs cannot move the command's timestamp.

use crate::{Command, CoreError, SongClock, protocol::command::parse_u32_lenient};

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, trace, warn};

/// Largest single write accepted from a transport.
pub const MAX_WRITE_LEN: usize = 255;

/// Classification of one transport write, decided before any text parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Every byte is an ASCII digit: a playback position in milliseconds.
    Clock(u32),
    /// Printable ASCII: one command line.
    Line(&'a str),
    /// Empty, or contains bytes outside printable ASCII.
    Noise,
}

/// Classify a raw write. All-digit payloads win over every text command.
pub fn classify(bytes: &[u8]) -> Inbound<'_> {
    if bytes.is_empty() {
        return Inbound::Noise;
    }

    if bytes.iter().all(u8::is_ascii_digit) {
        // All digits is valid UTF-8.
        let digits = std::str::from_utf8(bytes).unwrap_or_default();
        return Inbound::Clock(parse_u32_lenient(digits));
    }

    let printable = bytes
        .iter()
        .all(|&b| matches!(b, b' '..=b'~' | b'\t' | b'\r' | b'\n'));
    if !printable {
        return Inbound::Noise;
    }

    match std::str::from_utf8(bytes) {
        Ok(line) => Inbound::Line(line),
        Err(_) => Inbound::Noise,
    }
}

/// One item handed from a transport to the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueuedCommand {
    /// A parsed command and the song clock at the moment it arrived.
    Apply {
        /// The command.
        command: Command,
        /// Song clock when the write was dispatched.
        clock_ms: u32,
    },
    /// Printable text that did not parse, for the debug channel.
    Rejected {
        /// The offending line, trimmed.
        line: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// What happened to one write handed to [`Dispatcher::handle_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The song clock was set to this value.
    ClockUpdated(u32),
    /// A command was parsed and queued for the host loop.
    Queued,
    /// Printable text that did not parse as a command. The rejection is
    /// still forwarded to the host loop when the queue has room.
    Rejected,
    /// Noise, blank lines and over-long writes.
    Discarded,
    /// The command parsed but the host loop queue was full or closed.
    Dropped,
}

/// Routes transport writes into the clock or the host loop's command queue.
///
/// Cheap to clone; every transport gets its own handle.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    clock: Arc<SongClock>,
    commands: mpsc::Sender<QueuedCommand>,
    max_write_len: usize,
}

impl Dispatcher {
    /// Create a dispatcher writing to `clock` and queueing onto `commands`.
    pub fn new(clock: Arc<SongClock>, commands: mpsc::Sender<QueuedCommand>) -> Self {
        Self {
            clock,
            commands,
            max_write_len: MAX_WRITE_LEN,
        }
    }

    /// Override the largest accepted write.
    pub fn with_max_write_len(mut self, max_write_len: usize) -> Self {
        self.max_write_len = max_write_len;
        self
    }

    /// Classify and route one write. Never blocks.
    pub fn handle_bytes(&self, bytes: &[u8]) -> DispatchOutcome {
        if bytes.len() > self.max_write_len {
            debug!(
                len = bytes.len(),
                max = self.max_write_len,
                "Discarding over-long write"
            );
            return DispatchOutcome::Discarded;
        }

        match classify(bytes) {
            Inbound::Clock(ms) => {
                self.clock.set(ms);
                debug!(clock_ms = ms, "Song clock updated");
                DispatchOutcome::ClockUpdated(ms)
            }
            Inbound::Line(line) if line.trim().is_empty() => DispatchOutcome::Discarded,
            Inbound::Line(line) => match Command::parse(line) {
                Ok(command) => self.enqueue(QueuedCommand::Apply {
                    command,
                    clock_ms: self.clock.get(),
                }),
                Err(e) => {
                    warn!(error = %e, "Ignoring malformed command");
                    let reason = match e {
                        CoreError::MalformedCommand { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    // Stays Rejected even when the queue had no room for it.
                    let _ = self.enqueue(QueuedCommand::Rejected {
                        line: line.trim().to_string(),
                        reason,
                    });
                    DispatchOutcome::Rejected
                }
            },
            Inbound::Noise => {
                trace!(len = bytes.len(), "Discarding transport noise");
                DispatchOutcome::Discarded
            }
        }
    }

    fn enqueue(&self, command: QueuedCommand) -> DispatchOutcome {
        match self.commands.try_send(command) {
            Ok(()) => DispatchOutcome::Queued,
            Err(TrySendError::Full(command)) => {
                error!(?command, "Command queue full, command dropped");
                DispatchOutcome::Dropped
            }
            Err(TrySendError::Closed(command)) => {
                error!(?command, "Command queue closed, command dropped");
                DispatchOutcome::Dropped
            }
        }
    }
}
