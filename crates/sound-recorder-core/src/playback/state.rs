use crate::primitives::clock_label;

use std::{path::PathBuf, time::Duration};

/// Snapshot of a [`crate::PlaybackSession`].
///
/// `is_playing` is only ever true with a file loaded and a non-zero
/// duration. Position and duration are zero when nothing is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// File loaded into the player.
    pub current_file: Option<PathBuf>,
    /// Play head.
    pub position: Duration,
    /// Media length of the loaded file.
    pub duration: Duration,
    /// Whether audio is being rendered.
    pub is_playing: bool,
}

impl PlaybackState {
    /// Whether the play head reached the end of media.
    ///
    /// Also true when nothing is loaded.
    pub fn is_finished(&self) -> bool {
        self.position >= self.duration
    }

    /// Whether `path` is the loaded file.
    pub fn is_current(&self, path: &std::path::Path) -> bool {
        self.current_file.as_deref() == Some(path)
    }

    /// Play head as a fraction of the duration, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// `MM:SS / MM:SS` label for the loaded file.
    pub fn position_label(&self) -> String {
        format!(
            "{} / {}",
            clock_label(self.position),
            clock_label(self.duration)
        )
    }
}
