mod intent;
#[allow(clippy::module_inception)]
mod session;

pub use {
    intent::{DEFAULT_INTENT_CAPACITY, Intent, IntentQueue},
    session::{DEFAULT_EXPORT_FILE, NOTICE_CAPACITY, SessionOptions, SyncSession},
};
