use crate::{Amplitude, CoreResult};

use std::path::Path;

/// Source of capture devices (the platform microphone recorder).
pub trait CaptureBackend: Send + Sync {
    /// Acquire a capture device whose encoded output goes to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RecorderError::DeviceUnavailable`] when permission is
    /// denied or the microphone is busy.
    fn acquire(&self, output: &Path) -> CoreResult<Box<dyn CaptureDevice>>;
}

/// An acquired capture device.
///
/// Owned by exactly one [`crate::RecordingSession`]. `release` must be
/// called before the device is dropped or replaced.
pub trait CaptureDevice: Send {
    /// Begin capturing into the output file.
    fn start(&mut self) -> CoreResult<()>;

    /// Suspend capture without finalizing the output file.
    fn pause(&mut self) -> CoreResult<()>;

    /// Finalize the output file.
    fn stop(&mut self) -> CoreResult<()>;

    /// Free the underlying hardware handle. Infallible and idempotent.
    fn release(&mut self);

    /// Peak level observed since the previous call.
    fn current_amplitude(&mut self) -> Amplitude;
}
