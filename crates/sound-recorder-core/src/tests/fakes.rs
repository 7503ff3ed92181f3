//! In-memory stand-ins for the platform recorder and player.

use crate::{
    Amplitude, CaptureBackend, CaptureDevice, CompletionCallback, CoreResult, PlaybackBackend,
    PlaybackDevice, RecorderError, RecordingLibrary, SessionOptions,
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use error_location::ErrorLocation;
use tempfile::TempDir;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Default)]
pub(crate) struct CaptureLog {
    pub acquired: usize,
    pub started: usize,
    pub paused: usize,
    pub stopped: usize,
    pub released: usize,
    pub outputs: Vec<PathBuf>,
    pub unavailable: bool,
    pub fail_pause: bool,
    pub fail_stop: bool,
    pub amplitude: i32,
}

fn device_error(reason: &str) -> RecorderError {
    RecorderError::DeviceError {
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeCapture {
    log: Arc<Mutex<CaptureLog>>,
}

impl FakeCapture {
    pub fn log(&self) -> MutexGuard<'_, CaptureLog> {
        lock(&self.log)
    }
}

impl CaptureBackend for FakeCapture {
    fn acquire(&self, output: &Path) -> CoreResult<Box<dyn CaptureDevice>> {
        let mut log = lock(&self.log);
        if log.unavailable {
            return Err(RecorderError::DeviceUnavailable {
                reason: "microphone permission denied".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        fs::write(output, b"ftyp").map_err(|e| RecorderError::DeviceUnavailable {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        log.acquired += 1;
        log.outputs.push(output.to_path_buf());

        Ok(Box::new(FakeCaptureDevice {
            log: Arc::clone(&self.log),
        }))
    }
}

struct FakeCaptureDevice {
    log: Arc<Mutex<CaptureLog>>,
}

impl CaptureDevice for FakeCaptureDevice {
    fn start(&mut self) -> CoreResult<()> {
        lock(&self.log).started += 1;
        Ok(())
    }

    fn pause(&mut self) -> CoreResult<()> {
        let mut log = lock(&self.log);
        if log.fail_pause {
            return Err(device_error("recorder refused to pause"));
        }
        log.paused += 1;
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        let mut log = lock(&self.log);
        log.stopped += 1;
        if log.fail_stop {
            return Err(device_error("recorder stop failed"));
        }
        Ok(())
    }

    fn release(&mut self) {
        lock(&self.log).released += 1;
    }

    fn current_amplitude(&mut self) -> Amplitude {
        Amplitude::new(lock(&self.log).amplitude)
    }
}

#[derive(Default)]
pub(crate) struct PlayerLog {
    pub loads: usize,
    pub released: usize,
    pub duration: Duration,
    pub position: Duration,
    pub playing: bool,
    pub fail_load: bool,
    callback: Option<CompletionCallback>,
}

#[derive(Clone)]
pub(crate) struct FakePlayer {
    log: Arc<Mutex<PlayerLog>>,
}

impl FakePlayer {
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            log: Arc::new(Mutex::new(PlayerLog {
                duration,
                ..PlayerLog::default()
            })),
        }
    }

    pub fn log(&self) -> MutexGuard<'_, PlayerLog> {
        lock(&self.log)
    }

    /// Simulate the media reaching its end.
    pub fn finish(&self) {
        let mut log = lock(&self.log);
        log.position = log.duration;
        log.playing = false;
        if let Some(callback) = log.callback.as_ref() {
            callback();
        }
    }
}

impl PlaybackBackend for FakePlayer {
    fn load(&self, path: &Path) -> CoreResult<Box<dyn PlaybackDevice>> {
        let mut log = lock(&self.log);
        if log.fail_load || !path.exists() {
            return Err(RecorderError::LoadError {
                path: path.to_path_buf(),
                reason: "unreadable".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        log.loads += 1;
        log.position = Duration::ZERO;
        log.playing = false;
        log.callback = None;

        Ok(Box::new(FakePlayerDevice {
            log: Arc::clone(&self.log),
        }))
    }
}

struct FakePlayerDevice {
    log: Arc<Mutex<PlayerLog>>,
}

impl PlaybackDevice for FakePlayerDevice {
    fn start(&mut self) -> CoreResult<()> {
        lock(&self.log).playing = true;
        Ok(())
    }

    fn pause(&mut self) -> CoreResult<()> {
        lock(&self.log).playing = false;
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        lock(&self.log).playing = false;
        Ok(())
    }

    fn release(&mut self) {
        lock(&self.log).released += 1;
    }

    fn seek_to(&mut self, position: Duration) -> CoreResult<()> {
        lock(&self.log).position = position;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        lock(&self.log).playing
    }

    fn current_position(&self) -> Duration {
        lock(&self.log).position
    }

    fn duration(&self) -> Duration {
        lock(&self.log).duration
    }

    fn on_completion(&mut self, callback: CompletionCallback) {
        lock(&self.log).callback = Some(callback);
    }
}

/// Temporary storage laid out like a real install.
pub(crate) struct Fixture {
    pub dir: TempDir,
    pub capture: FakeCapture,
    pub player: FakePlayer,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            capture: FakeCapture::default(),
            player: FakePlayer::with_duration(Duration::from_millis(2000)),
        }
    }

    pub fn library_root(&self) -> PathBuf {
        self.dir.path().join("SoundRecorder")
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.dir.path().join("cache")
    }

    pub fn library(&self) -> RecordingLibrary {
        RecordingLibrary::new(self.library_root())
    }

    pub fn options(&self) -> SessionOptions {
        SessionOptions::new(self.temp_dir())
    }

    /// Create a file in the library root and return its path.
    pub fn touch(&self, name: &str) -> PathBuf {
        let root = self.library_root();
        fs::create_dir_all(&root).unwrap();
        let path = root.join(name);
        fs::write(&path, b"audio").unwrap();
        path
    }
}
