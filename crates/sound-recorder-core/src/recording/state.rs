use crate::{Amplitude, RecordingFile, primitives::clock_label};

use std::time::Duration;

/// Discrete states of the capture state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordingPhase {
    /// Nothing captured yet.
    #[default]
    Idle,
    /// Capturing audio.
    Recording,
    /// Capture suspended, elapsed time frozen.
    Paused,
    /// Capture finalized.
    Stopped,
}

/// Snapshot of a [`crate::RecordingSession`].
///
/// `pending_file` is only ever set while `phase` is
/// [`RecordingPhase::Stopped`] and the naming prompt is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingState {
    /// Current phase.
    pub phase: RecordingPhase,
    /// Time captured so far in the current recording.
    pub elapsed: Duration,
    /// Last sampled capture level.
    pub amplitude: Amplitude,
    /// Just-saved recording awaiting a name.
    pub pending_file: Option<RecordingFile>,
}

impl RecordingState {
    /// Whether audio is being captured right now.
    pub fn is_recording(&self) -> bool {
        self.phase == RecordingPhase::Recording
    }

    /// Whether a capture device is held (recording or paused).
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            RecordingPhase::Recording | RecordingPhase::Paused
        )
    }

    /// Name to prefill the naming prompt with.
    pub fn suggested_name(&self) -> Option<&str> {
        self.pending_file.as_ref().map(RecordingFile::name)
    }

    /// Elapsed time as `MM:SS`.
    pub fn elapsed_label(&self) -> String {
        clock_label(self.elapsed)
    }

    pub(crate) fn started(&self) -> Self {
        Self {
            phase: RecordingPhase::Recording,
            elapsed: Duration::ZERO,
            amplitude: Amplitude::ZERO,
            pending_file: None,
        }
    }

    pub(crate) fn paused(&self, elapsed: Duration) -> Self {
        Self {
            phase: RecordingPhase::Paused,
            elapsed,
            ..self.clone()
        }
    }

    pub(crate) fn stopped(&self, saved: Option<RecordingFile>) -> Self {
        Self {
            phase: RecordingPhase::Stopped,
            elapsed: Duration::ZERO,
            amplitude: Amplitude::ZERO,
            pending_file: saved,
        }
    }

    pub(crate) fn cleared_file(&self) -> Self {
        Self {
            pending_file: None,
            ..self.clone()
        }
    }
}
