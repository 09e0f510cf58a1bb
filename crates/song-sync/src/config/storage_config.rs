use crate::config::{default_export_file, default_journal_file};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Journal and export storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the journal and the export artifact.
    pub data_dir: PathBuf,

    /// Journal file name inside `data_dir`.
    #[serde(default = "default_journal_file")]
    pub journal_file: String,

    /// Export artifact file name inside `data_dir`.
    #[serde(default = "default_export_file")]
    pub export_file: String,
}

impl StorageConfig {
    /// Storage rooted at `data_dir` with default file names.
    pub fn in_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            journal_file: default_journal_file(),
            export_file: default_export_file(),
        }
    }
}
