use crate::config::{default_bind_address, default_command_queue_depth, default_max_write_len};

use serde::{Deserialize, Serialize};

/// Wireless link stand-in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Socket address the WebSocket endpoint listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Longest single write accepted; longer writes are discarded.
    #[serde(default = "default_max_write_len")]
    pub max_write_len: usize,

    /// Commands buffered between transports and the host loop.
    #[serde(default = "default_command_queue_depth")]
    pub command_queue_depth: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_write_len: default_max_write_len(),
            command_queue_depth: default_command_queue_depth(),
        }
    }
}
