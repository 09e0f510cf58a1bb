use std::sync::atomic::{AtomicU32, Ordering};

/// Current playback position of the song on the paired phone.
///
/// Written from transport contexts (every all-digit write) and read by the host
/// loop on each scheduler tick. The value is set, never incremented, so it may
/// move backwards when the phone seeks.
#[derive(Debug, Default)]
pub struct SongClock {
    current_ms: AtomicU32,
}

impl SongClock {
    /// Create a clock positioned at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the playback position.
    pub fn set(&self, ms: u32) {
        self.current_ms.store(ms, Ordering::Release);
    }

    /// Read the most recently written playback position.
    pub fn get(&self) -> u32 {
        self.current_ms.load(Ordering::Acquire)
    }
}
