mod camera_config;
#[allow(clippy::module_inception)]
mod config;
mod export_config;
mod link_config;
mod notify_config;
mod scheduler_config;
mod storage_config;

pub(crate) use {
    camera_config::CameraConfig, config::Config, export_config::ExportConfig,
    link_config::LinkConfig, notify_config::NotifyConfig, scheduler_config::SchedulerConfig,
    storage_config::StorageConfig,
};

use song_sync_core::{
    DEFAULT_CHUNK_SIZE, DEFAULT_END_MARGIN_MS, DEFAULT_EXPORT_FILE, DEFAULT_JOURNAL_FILE, DEFAULT_MAX_CLIPS,
    DEFAULT_PROJECT_NAME, DEFAULT_START_WINDOW_MS, MAX_WRITE_LEN,
};

pub(crate) const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:7879";
pub(crate) const DEFAULT_COMMAND_QUEUE_DEPTH: usize = 32;
pub(crate) const DEFAULT_PACING_MS: u64 = 20;
pub(crate) const DEFAULT_CAMERA_URL: &str = "http://10.5.5.9";
pub(crate) const DEFAULT_CAMERA_TIMEOUT_MS: u64 = 4000;
pub(crate) const DEFAULT_TICK_INTERVAL_MS: u64 = 10;

pub(crate) fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

pub(crate) fn default_max_write_len() -> usize {
    MAX_WRITE_LEN
}

pub(crate) fn default_command_queue_depth() -> usize {
    DEFAULT_COMMAND_QUEUE_DEPTH
}

pub(crate) fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE.get()
}

pub(crate) fn default_pacing_ms() -> u64 {
    DEFAULT_PACING_MS
}

pub(crate) fn default_camera_url() -> String {
    DEFAULT_CAMERA_URL.to_string()
}

pub(crate) fn default_camera_timeout_ms() -> u64 {
    DEFAULT_CAMERA_TIMEOUT_MS
}

pub(crate) fn default_start_window_ms() -> u32 {
    DEFAULT_START_WINDOW_MS
}

pub(crate) fn default_end_margin_ms() -> u32 {
    DEFAULT_END_MARGIN_MS
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

pub(crate) fn default_journal_file() -> String {
    DEFAULT_JOURNAL_FILE.to_string()
}

pub(crate) fn default_export_file() -> String {
    DEFAULT_EXPORT_FILE.to_string()
}

pub(crate) fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

pub(crate) fn default_max_clips() -> usize {
    DEFAULT_MAX_CLIPS
}
