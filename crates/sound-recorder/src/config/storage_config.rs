use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where recordings live on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Library directory listed by the recorder.
    pub recordings_dir: PathBuf,

    /// Scratch directory for captures in progress. Never listed.
    pub temp_dir: PathBuf,
}
