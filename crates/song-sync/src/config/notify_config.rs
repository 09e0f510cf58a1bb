use crate::config::{default_chunk_size, default_pacing_ms};

use serde::{Deserialize, Serialize};

/// Chunked notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Payload bytes per `XML_CHUNK` frame.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Delay between consecutive frames.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            pacing_ms: default_pacing_ms(),
        }
    }
}
