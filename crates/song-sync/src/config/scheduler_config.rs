use crate::config::{default_end_margin_ms, default_start_window_ms, default_tick_interval_ms};

use serde::{Deserialize, Serialize};
use song_sync_core::SchedulerThresholds;

/// Auto-record timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Window after song start within which auto-record may begin.
    #[serde(default = "default_start_window_ms")]
    pub start_window_ms: u32,

    /// Distance from the song end at which auto-record stops.
    #[serde(default = "default_end_margin_ms")]
    pub end_margin_ms: u32,

    /// Host loop period.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl SchedulerConfig {
    /// Thresholds handed to the scheduler.
    pub fn thresholds(&self) -> SchedulerThresholds {
        SchedulerThresholds {
            start_window_ms: self.start_window_ms,
            end_margin_ms: self.end_margin_ms,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            start_window_ms: default_start_window_ms(),
            end_margin_ms: default_end_margin_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}
