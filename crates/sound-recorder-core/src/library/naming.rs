//! File naming conventions for temporary and permanent recordings.

use crate::AudioFormat;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};

/// Format new recordings are captured in.
pub(crate) const CAPTURE_FORMAT: AudioFormat = AudioFormat::M4a;

const TEMP_PREFIX: &str = "recording_";
const PERMANENT_PREFIX: &str = "record_";
const PERMANENT_TIMESTAMP: &str = "%Y-%m-%d_%H-%M-%S";

/// Path for an in-progress capture inside `temp_dir`.
pub(crate) fn temp_capture_path(temp_dir: &Path, now: DateTime<Utc>) -> PathBuf {
    unique_path(
        temp_dir,
        &format!("{TEMP_PREFIX}{}", now.timestamp_millis()),
        CAPTURE_FORMAT.extension(),
    )
}

/// Path a finished capture is saved under inside the library root.
pub(crate) fn permanent_path(root: &Path, at: DateTime<Local>, ext: &str) -> PathBuf {
    unique_path(
        root,
        &format!("{PERMANENT_PREFIX}{}", at.format(PERMANENT_TIMESTAMP)),
        ext,
    )
}

/// First of `stem.ext`, `stem_1.ext`, `stem_2.ext`, ... that does not exist.
fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{ext}"));
    if !candidate.exists() {
        return candidate;
    }

    (1u32..)
        .map(|n| dir.join(format!("{stem}_{n}.{ext}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Reduce a user-supplied name to a safe file stem.
///
/// Surrounding whitespace is trimmed and every character outside
/// `[A-Za-z0-9-_ ]` becomes `_`. Returns `None` if nothing is left.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let sanitized: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();

    (!sanitized.is_empty()).then_some(sanitized)
}
