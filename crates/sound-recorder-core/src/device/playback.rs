use crate::CoreResult;

use std::{path::Path, time::Duration};

/// Invoked by a playback device when it reaches end of media.
///
/// May be called from any thread, including from inside another device
/// method. Implementations of the session side only enqueue a signal here.
pub type CompletionCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Source of playback devices (the platform media player).
pub trait PlaybackBackend: Send + Sync {
    /// Open `path` and prepare it for playback.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RecorderError::LoadError`] if the file is missing or
    /// cannot be decoded.
    fn load(&self, path: &Path) -> CoreResult<Box<dyn PlaybackDevice>>;
}

/// A loaded playback device.
pub trait PlaybackDevice: Send {
    /// Start or resume playback from the current position.
    fn start(&mut self) -> CoreResult<()>;

    /// Pause, keeping the current position.
    fn pause(&mut self) -> CoreResult<()>;

    /// Halt playback.
    fn stop(&mut self) -> CoreResult<()>;

    /// Free the underlying handle. Infallible and idempotent.
    fn release(&mut self);

    /// Move the play head.
    fn seek_to(&mut self, position: Duration) -> CoreResult<()>;

    /// Whether audio is currently being rendered.
    fn is_playing(&self) -> bool;

    /// Current play head.
    fn current_position(&self) -> Duration;

    /// Total media length.
    fn duration(&self) -> Duration;

    /// Register the end-of-media callback, replacing any previous one.
    fn on_completion(&mut self, callback: CompletionCallback);
}
