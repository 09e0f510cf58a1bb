mod entry;
#[allow(clippy::module_inception)]
mod journal;
mod storage;

pub use {
    entry::JournalEntry,
    journal::{DEFAULT_JOURNAL_FILE, EventJournal},
    storage::{FsStorage, MemoryStorage, Storage},
};
