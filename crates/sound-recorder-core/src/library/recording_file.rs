use crate::{AudioFormat, CoreResult, RecorderError};

use std::{
    cmp::Ordering,
    fs,
    hash::{Hash, Hasher},
    panic::Location,
    path::{Path, PathBuf},
    time::SystemTime,
};

use error_location::ErrorLocation;

/// A persisted recording in the library.
///
/// Identity is the storage path: two values with the same path compare
/// equal even if their metadata was read at different times.
#[derive(Debug, Clone)]
pub struct RecordingFile {
    path: PathBuf,
    name: String,
    modified: SystemTime,
    format: AudioFormat,
}

impl RecordingFile {
    /// Read metadata for a recording at `path`.
    ///
    /// Returns `Ok(None)` when the path is not a regular file with an
    /// allowed extension.
    #[track_caller]
    pub fn open(path: &Path) -> CoreResult<Option<Self>> {
        let Some(format) = AudioFormat::from_path(path) else {
            return Ok(None);
        };

        let metadata = fs::metadata(path).map_err(|source| RecorderError::PersistenceFailure {
            path: path.to_path_buf(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(Some(Self {
            path: path.to_path_buf(),
            name: display_name(path),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            format,
        }))
    }

    /// Storage path, the file's identity.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last modification time as reported by the filesystem.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Container format.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// File name including extension.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl PartialEq for RecordingFile {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for RecordingFile {}

impl Hash for RecordingFile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl PartialOrd for RecordingFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordingFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}
