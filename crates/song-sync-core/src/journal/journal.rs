use crate::{CoreResult, journal::JournalEntry, journal::Storage};

use tracing::{debug, info, instrument, warn};

/// Default file name of the journal.
pub const DEFAULT_JOURNAL_FILE: &str = "events.log";

/// Append-only, ordered log of domain events on top of a [`Storage`].
///
/// `append` and `clear` are the only mutators. Entries are never edited or
/// removed one at a time.
#[derive(Debug)]
pub struct EventJournal<S: Storage> {
    storage: S,
    file: String,
}

impl<S: Storage> EventJournal<S> {
    /// Open the journal stored in `file`.
    pub fn new(storage: S, file: impl Into<String>) -> Self {
        Self {
            storage,
            file: file.into(),
        }
    }

    /// Append one entry as one line.
    #[track_caller]
    pub fn append(&mut self, entry: &JournalEntry) -> CoreResult<()> {
        let line = entry.to_string();
        self.storage.append(&self.file, &line)?;
        debug!(entry = %line, "Journal append");
        Ok(())
    }

    /// Every committed entry, in append order.
    ///
    /// A final line without terminator is a torn write and is skipped, as is
    /// any line that does not decode.
    #[track_caller]
    #[instrument(skip(self), fields(file = %self.file))]
    pub fn read_all(&self) -> CoreResult<Vec<JournalEntry>> {
        let text = self.storage.read_all(&self.file)?;
        let mut entries = Vec::new();

        for raw in text.split_inclusive('\n') {
            if !raw.ends_with('\n') {
                warn!(line = raw, "Skipping torn journal tail");
                continue;
            }

            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match JournalEntry::parse_line(line) {
                Some(entry) => entries.push(entry),
                None => warn!(line, "Skipping unreadable journal line"),
            }
        }

        Ok(entries)
    }

    /// The journal file exactly as stored.
    #[track_caller]
    pub fn raw_text(&self) -> CoreResult<String> {
        self.storage.read_all(&self.file)
    }

    /// Truncate to empty. Irreversible.
    #[track_caller]
    #[instrument(skip(self), fields(file = %self.file))]
    pub fn clear(&mut self) -> CoreResult<()> {
        self.storage.remove(&self.file)?;
        info!("Journal cleared");
        Ok(())
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The underlying storage, for artifacts kept next to the journal.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
