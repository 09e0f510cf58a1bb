use std::collections::VecDeque;

use tracing::error;

/// Default number of intents the host loop may have outstanding.
pub const DEFAULT_INTENT_CAPACITY: usize = 16;

/// Slow work deferred to the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start the external recorder.
    StartRecorder,
    /// Stop the external recorder.
    StopRecorder,
    /// Reconstruct, render and deliver the timeline.
    Export,
    /// Write the raw journal to the debug channel.
    DumpJournal,
}

/// Bounded FIFO of pending [`Intent`]s.
///
/// Intents are never coalesced: two stops queued in one iteration are two
/// stops. When full, the newest intent is rejected and logged.
#[derive(Debug)]
pub struct IntentQueue {
    queue: VecDeque<Intent>,
    capacity: usize,
}

impl Default for IntentQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INTENT_CAPACITY)
    }
}

impl IntentQueue {
    /// Create a queue holding at most `capacity` intents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Queue `intent`. Returns `false` if the queue was full.
    pub fn push(&mut self, intent: Intent) -> bool {
        if self.queue.len() >= self.capacity {
            error!(?intent, capacity = self.capacity, "Intent queue full, intent rejected");
            return false;
        }
        self.queue.push_back(intent);
        true
    }

    /// Remove and return every pending intent, oldest first.
    pub fn drain(&mut self) -> Vec<Intent> {
        self.queue.drain(..).collect()
    }

    /// Number of pending intents.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
