/// Line buffer size for stream transports, terminator slot included.
pub const LINE_CAPACITY: usize = 256;

/// Reassembles a byte stream (e.g. a serial port) into command lines.
///
/// Bytes accumulate until `\r` or `\n`. Empty lines are skipped. When the buffer
/// holds `CAP - 1` bytes without a terminator, those bytes are dispatched as a
/// line of their own and accumulation restarts, so an unterminated flood is never
/// discarded wholesale.
#[derive(Debug, Clone)]
pub struct LineAccumulator<const CAP: usize = LINE_CAPACITY> {
    buf: Vec<u8>,
}

impl<const CAP: usize> Default for LineAccumulator<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> LineAccumulator<CAP> {
    /// Largest line this accumulator emits.
    pub const MAX_LINE: usize = CAP.saturating_sub(1);

    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(CAP),
        }
    }

    /// Feed raw bytes, returning every line completed by them in arrival order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();

        for &byte in bytes {
            if byte == b'\n' || byte == b'\r' {
                if !self.buf.is_empty() {
                    lines.push(std::mem::take(&mut self.buf));
                }
                continue;
            }

            self.buf.push(byte);

            if self.buf.len() >= Self::MAX_LINE {
                tracing::warn!(
                    capacity = CAP,
                    "Line buffer full without terminator, forcing dispatch"
                );
                lines.push(std::mem::take(&mut self.buf));
            }
        }

        lines
    }

    /// Bytes of the line currently being accumulated.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }
}
