use crate::virtual_device::encode_header;

use sound_recorder_core::{Amplitude, CaptureBackend, CaptureDevice, CoreResult, RecorderError};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::time::Instant;
use tracing::debug;

/// Length of one rise-and-fall of the synthetic level.
const ENVELOPE_PERIOD: Duration = Duration::from_millis(2_000);

/// Capture backend that records elapsed time instead of sound.
pub(crate) struct VirtualCapture {
    amplitude_ceiling: u16,
}

impl VirtualCapture {
    pub(crate) fn new(amplitude_ceiling: u16) -> Self {
        Self { amplitude_ceiling }
    }
}

impl CaptureBackend for VirtualCapture {
    #[track_caller]
    fn acquire(&self, output: &Path) -> CoreResult<Box<dyn CaptureDevice>> {
        fs::File::create(output).map_err(|e| RecorderError::DeviceUnavailable {
            reason: format!("Cannot open {:?} for capture: {}", output, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(output = ?output, "Virtual capture acquired");

        Ok(Box::new(VirtualCaptureDevice {
            output: output.to_path_buf(),
            ceiling: self.amplitude_ceiling,
            segment_start: None,
            captured: Duration::ZERO,
        }))
    }
}

struct VirtualCaptureDevice {
    output: PathBuf,
    ceiling: u16,
    segment_start: Option<Instant>,
    captured: Duration,
}

impl VirtualCaptureDevice {
    fn total(&self) -> Duration {
        match self.segment_start {
            Some(start) => self.captured + start.elapsed(),
            None => self.captured,
        }
    }

    fn close_segment(&mut self) {
        if let Some(start) = self.segment_start.take() {
            self.captured += start.elapsed();
        }
    }
}

impl CaptureDevice for VirtualCaptureDevice {
    fn start(&mut self) -> CoreResult<()> {
        if self.segment_start.is_none() {
            self.segment_start = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) -> CoreResult<()> {
        self.close_segment();
        Ok(())
    }

    #[track_caller]
    fn stop(&mut self) -> CoreResult<()> {
        self.close_segment();

        fs::write(&self.output, encode_header(self.captured)).map_err(|e| {
            RecorderError::DeviceError {
                reason: format!("Failed to finalize {:?}: {}", self.output, e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        debug!(
            output = ?self.output,
            captured_ms = self.captured.as_millis(),
            "Virtual capture finalized"
        );

        Ok(())
    }

    fn release(&mut self) {
        self.segment_start = None;
    }

    /// Triangle wave over [`ENVELOPE_PERIOD`], silent while paused.
    fn current_amplitude(&mut self) -> Amplitude {
        if self.segment_start.is_none() {
            return Amplitude::ZERO;
        }

        let period = ENVELOPE_PERIOD.as_millis();
        let half = period / 2;
        let phase = self.total().as_millis() % period;
        let rise = if phase < half { phase } else { period - phase };

        let level = u128::from(self.ceiling) * rise / half;

        Amplitude::new(i32::try_from(level).unwrap_or(i32::MAX))
    }
}
