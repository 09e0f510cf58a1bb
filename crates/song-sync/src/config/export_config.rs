use crate::config::{default_max_clips, default_project_name};

use serde::{Deserialize, Serialize};

/// Timeline export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Project name written into the artifact.
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Most clips a single export may hold.
    #[serde(default = "default_max_clips")]
    pub max_clips: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            max_clips: default_max_clips(),
        }
    }
}
