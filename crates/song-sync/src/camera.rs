//! External camera control over its HTTP shutter API.

use crate::{AppError, AppResult, config::CameraConfig};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Shutter control of the external recorder.
///
/// Calls may take seconds; only the host loop makes them.
pub(crate) trait RecorderControl {
    /// Start recording on the device.
    async fn trigger_start(&self) -> AppResult<()>;

    /// Stop recording on the device.
    async fn trigger_stop(&self) -> AppResult<()>;
}

/// HTTP client for a camera exposing `/gp/gpControl/command/shutter`.
pub struct CameraClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CameraClient {
    /// Build a client for the camera at `config.base_url`.
    #[track_caller]
    pub fn new(config: &CameraConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::RecorderUnreachable {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Shutter URL for `p=1` (start) or `p=0` (stop).
    pub fn shutter_url(&self, start: bool) -> String {
        format!(
            "{}/gp/gpControl/command/shutter?p={}",
            self.base_url,
            if start { 1 } else { 0 }
        )
    }

    #[instrument(skip(self))]
    async fn shutter(&self, start: bool) -> AppResult<()> {
        let url = self.shutter_url(start);
        debug!(url = %url, "Camera shutter request");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            AppError::RecorderUnreachable {
                reason: format!("GET {} failed: {}", url, e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::RecorderUnreachable {
                reason: format!("GET {} returned {}", url, status),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}

impl RecorderControl for CameraClient {
    async fn trigger_start(&self) -> AppResult<()> {
        self.shutter(true).await
    }

    async fn trigger_stop(&self) -> AppResult<()> {
        self.shutter(false).await
    }
}
