use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recorder errors with source location tracking.
///
/// Commands issued in a phase that does not support them are not errors;
/// sessions treat them as identity transitions.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Capture device could not be acquired (permission denied, device busy).
    #[error("Capture device unavailable: {reason} {location}")]
    DeviceUnavailable {
        /// Description of why the device could not be acquired.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A device operation failed on an already acquired device.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recording could not be loaded for playback (corrupt or missing).
    #[error("Failed to load {path:?}: {reason} {location}")]
    LoadError {
        /// File that failed to load.
        path: PathBuf,
        /// Description of the load failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Move, rename, listing, or delete on the storage directory failed.
    #[error("Persistence failure on {path:?}: {source} {location}")]
    PersistenceFailure {
        /// Path the failed operation was applied to.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Rename target already exists; nothing was changed.
    #[error("A recording named {path:?} already exists {location}")]
    NameCollision {
        /// The existing path that blocked the rename.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Requested name is empty after sanitizing.
    #[error("Invalid recording name: {name:?} {location}")]
    InvalidName {
        /// The name as supplied by the user.
        name: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
