use crate::{
    CoreResult, RecorderError, RecordingFile,
    library::naming::{self, CAPTURE_FORMAT},
    sanitize_name,
};

use std::{
    cmp::Reverse,
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Catalog of persisted recordings in a fixed storage directory.
///
/// Holds no handles and no cache: every listing re-reads the directory, so
/// files added or removed by other processes show up on the next call.
#[derive(Debug, Clone)]
pub struct RecordingLibrary {
    root: PathBuf,
}

impl RecordingLibrary {
    /// Library rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All recordings, most recently modified first.
    ///
    /// Files without an allowed extension are skipped, as are entries whose
    /// metadata disappears mid-scan.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::PersistenceFailure`] if the directory cannot
    /// be created or read.
    #[track_caller]
    #[instrument(skip(self), fields(root = ?self.root))]
    pub fn list(&self) -> CoreResult<Vec<RecordingFile>> {
        self.ensure_root()?;

        let entries = fs::read_dir(&self.root).map_err(|source| self.failure(source))?;

        let mut files: Vec<RecordingFile> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| match RecordingFile::open(&entry.path()) {
                Ok(file) => file,
                Err(e) => {
                    debug!(error = ?e, "Skipping unreadable entry");
                    None
                }
            })
            .collect();

        files.sort_by(|a, b| {
            Reverse(a.modified())
                .cmp(&Reverse(b.modified()))
                .then_with(|| a.path().cmp(b.path()))
        });

        debug!(count = files.len(), "Library listed");

        Ok(files)
    }

    /// Delete every path in `files`, skipping any that fail.
    ///
    /// Returns the number of files actually removed. Callers learn about
    /// failures only through a fresh [`RecordingLibrary::list`].
    #[instrument(skip(self, files))]
    pub fn delete<'a, I>(&self, files: I) -> usize
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut removed = 0;

        for path in files {
            match fs::remove_file(path) {
                Ok(()) => {
                    removed += 1;
                    debug!(path = ?path, "Recording deleted");
                }
                Err(e) => warn!(path = ?path, error = %e, "Failed to delete recording"),
            }
        }

        info!(removed, "Delete finished");

        removed
    }

    /// Rename `file` to `new_name`, keeping its extension.
    ///
    /// Renaming a file to its current name succeeds without touching disk.
    ///
    /// # Errors
    ///
    /// - [`RecorderError::InvalidName`] if `new_name` sanitizes to nothing.
    /// - [`RecorderError::NameCollision`] if the target already exists; the
    ///   filesystem is left untouched.
    /// - [`RecorderError::PersistenceFailure`] if the rename itself fails.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn rename(&self, file: &Path, new_name: &str) -> CoreResult<RecordingFile> {
        let stem = sanitize_name(new_name).ok_or_else(|| RecorderError::InvalidName {
            name: new_name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let ext = file
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| CAPTURE_FORMAT.extension().to_string());
        let dir = file.parent().unwrap_or(&self.root);
        let target = dir.join(format!("{stem}.{ext}"));

        if target != file {
            if target.exists() {
                return Err(RecorderError::NameCollision {
                    path: target,
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            fs::rename(file, &target).map_err(|source| RecorderError::PersistenceFailure {
                path: file.to_path_buf(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(from = ?file, to = ?target, "Recording renamed");
        }

        self.describe(&target)
    }

    /// Move a finished capture from `temp` into the library under a fresh
    /// timestamped name.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::PersistenceFailure`] if the file cannot be
    /// moved. The temporary file is left where it was.
    #[track_caller]
    pub fn persist(&self, temp: &Path) -> CoreResult<RecordingFile> {
        self.persist_at(temp, Local::now())
    }

    #[track_caller]
    #[instrument(skip(self, at))]
    pub(crate) fn persist_at(&self, temp: &Path, at: DateTime<Local>) -> CoreResult<RecordingFile> {
        self.ensure_root()?;

        let ext = temp
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| CAPTURE_FORMAT.extension().to_string());
        let target = naming::permanent_path(&self.root, at, &ext);

        if let Err(rename_err) = fs::rename(temp, &target) {
            // Temp and library may live on different filesystems.
            debug!(error = %rename_err, "Rename failed, falling back to copy");

            if let Err(source) = fs::copy(temp, &target) {
                let _ = fs::remove_file(&target);
                return Err(RecorderError::PersistenceFailure {
                    path: temp.to_path_buf(),
                    source,
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            if let Err(e) = fs::remove_file(temp) {
                warn!(temp = ?temp, error = %e, "Saved copy but could not remove temp file");
            }
        }

        info!(path = ?target, "Recording saved");

        self.describe(&target)
    }

    #[track_caller]
    fn describe(&self, path: &Path) -> CoreResult<RecordingFile> {
        RecordingFile::open(path)?.ok_or_else(|| RecorderError::PersistenceFailure {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a recognized recording",
            ),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn ensure_root(&self) -> CoreResult<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|source| self.failure(source))?;
            debug!(root = ?self.root, "Created library directory");
        }
        Ok(())
    }

    #[track_caller]
    fn failure(&self, source: std::io::Error) -> RecorderError {
        RecorderError::PersistenceFailure {
            path: self.root.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
