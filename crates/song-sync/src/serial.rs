//! Serial debug channel: line input from stdin, human-readable output to stdout.

use crate::AppResult;

use std::io::{self, Write};

use song_sync_core::{DispatchOutcome, Dispatcher, LineAccumulator};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    sync::watch,
};
use tracing::{info, instrument, warn};

const READ_CHUNK: usize = 64;

/// Splits a byte stream into lines and hands each to the dispatcher.
pub struct SerialReader {
    dispatcher: Dispatcher,
    lines: LineAccumulator,
}

impl SerialReader {
    /// Create a reader feeding `dispatcher`.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            lines: LineAccumulator::new(),
        }
    }

    /// Dispatch every line completed by `bytes`.
    pub fn ingest(&mut self, bytes: &[u8]) -> Vec<DispatchOutcome> {
        self.lines
            .feed(bytes)
            .iter()
            .map(|line| self.dispatcher.handle_bytes(line))
            .collect()
    }

    /// Read `input` until end of stream or shutdown.
    #[instrument(skip_all)]
    pub async fn run<R: AsyncRead + Unpin>(
        mut self,
        mut input: R,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> AppResult<()> {
        let mut buf = [0u8; READ_CHUNK];

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                read = input.read(&mut buf) => {
                    let n = read?;
                    if n == 0 {
                        info!("Serial input closed");
                        break;
                    }
                    self.ingest(&buf[..n]);
                }
            }
        }

        Ok(())
    }
}

/// Human-readable output side of the debug channel.
pub struct DebugConsole {
    out: Box<dyn Write + Send>,
}

impl DebugConsole {
    /// Console writing to `out`.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    /// Console writing to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Print one line.
    pub fn line(&mut self, text: &str) {
        let written = writeln!(self.out, "{}", text).and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!(error = %e, "Debug console write failed");
        }
    }

    /// Print a file under a `--- name ---` banner.
    pub fn dump(&mut self, name: &str, contents: &str) {
        self.line(&format!("\n--- {} ---", name));
        self.line(contents.trim_end_matches('\n'));
    }
}
