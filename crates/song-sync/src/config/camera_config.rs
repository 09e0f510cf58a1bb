use crate::config::{default_camera_timeout_ms, default_camera_url};

use serde::{Deserialize, Serialize};

/// External camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Base URL of the camera's HTTP control API.
    #[serde(default = "default_camera_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_camera_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            base_url: default_camera_url(),
            timeout_ms: default_camera_timeout_ms(),
        }
    }
}
