use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Synchronization core errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Command text had an unknown prefix or was missing a required argument.
    #[error("Malformed command: {reason} {location}")]
    MalformedCommand {
        /// Human-readable reason the command was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The storage collaborator could not serve a journal or artifact operation.
    #[error("Storage unavailable: {reason} {location}")]
    StorageUnavailable {
        /// Description of the failed storage operation.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Underlying filesystem error.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The journal holds more completed clips than the reconstruction capacity.
    #[error("Export capacity exceeded: more than {capacity} clips {location}")]
    ExportCapacityExceeded {
        /// Maximum number of clips a timeline may hold.
        capacity: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A notification frame could not be decoded or did not fit the reassembly.
    #[error("Invalid frame: {reason} {location}")]
    InvalidFrame {
        /// Description of the framing violation.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CoreError {
    #[track_caller]
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CoreError::MalformedCommand {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn storage(reason: impl Into<String>) -> Self {
        CoreError::StorageUnavailable {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn invalid_frame(reason: impl Into<String>) -> Self {
        CoreError::InvalidFrame {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

// Cannot use #[from] because it does not support extra fields.
impl From<std::io::Error> for CoreError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        CoreError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = StdResult<T, CoreError>;
