//! Configuration management for song-sync.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        CameraConfig, ExportConfig, LinkConfig, NotifyConfig, SchedulerConfig, StorageConfig,
    },
};

use std::{
    fs,
    io::Write,
    num::NonZeroUsize,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use song_sync_core::SessionOptions;
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wireless link stand-in.
    #[serde(default)]
    pub link: LinkConfig,
    /// Chunked notifications.
    #[serde(default)]
    pub notify: NotifyConfig,
    /// External camera.
    #[serde(default)]
    pub camera: CameraConfig,
    /// Auto-record timing.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Journal and export storage.
    pub storage: StorageConfig,
    /// Timeline export.
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Defaults with storage rooted at `data_dir`.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            link: LinkConfig::default(),
            notify: NotifyConfig::default(),
            camera: CameraConfig::default(),
            scheduler: SchedulerConfig::default(),
            storage: StorageConfig::in_dir(data_dir),
            export: ExportConfig::default(),
        }
    }

    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            Self::create_default(&config_path)
        }
    }

    /// Load and validate configuration from `path`.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Reject values the host loop cannot run with.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let zero = [
            ("notify.chunk_size", self.notify.chunk_size == 0),
            ("link.max_write_len", self.link.max_write_len == 0),
            ("link.command_queue_depth", self.link.command_queue_depth == 0),
            ("export.max_clips", self.export.max_clips == 0),
            ("scheduler.tick_interval_ms", self.scheduler.tick_interval_ms == 0),
        ];

        if let Some((key, _)) = zero.iter().find(|(_, is_zero)| *is_zero) {
            return Err(AppError::ConfigError {
                reason: format!("{} must be greater than zero", key),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Session tunables derived from the scheduler, storage and export sections.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            thresholds: self.scheduler.thresholds(),
            max_clips: self.export.max_clips,
            export_file: self.storage.export_file.clone(),
            project_name: self.export.project_name.clone(),
        }
    }

    /// Validated chunk size. Falls back to the default for a zero value.
    pub fn chunk_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.notify.chunk_size).unwrap_or(song_sync_core::DEFAULT_CHUNK_SIZE)
    }

    /// Delay between notification frames.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.notify.pacing_ms)
    }

    /// Host loop period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.scheduler.tick_interval_ms.max(1))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "song-sync", "Song-Sync").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default(config_path: &Path) -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;
        let config = Config::with_data_dir(proj_dirs.data_dir().to_path_buf());

        config.save_to(config_path)?;

        info!(data_dir = ?config.storage.data_dir, "Default config created");

        Ok(config)
    }
}
