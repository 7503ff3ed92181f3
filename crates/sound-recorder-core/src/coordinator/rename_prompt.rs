use std::path::PathBuf;

/// Open rename dialog for a library file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePrompt {
    /// File being renamed.
    pub file: PathBuf,
    /// Current stem, offered as the starting text.
    pub suggested_name: String,
}

impl RenamePrompt {
    pub(crate) fn for_file(file: PathBuf) -> Self {
        let suggested_name = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            suggested_name,
        }
    }
}
